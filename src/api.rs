use crate::config::ApiConfig;
use crate::model::{StudentId, StudentRecord};
use eyre::{Error, WrapErr, eyre};
use reqwest::{Client, StatusCode, Url};
use tracing::{debug, trace};

/// Result of reading the student list. Any status other than 200 is a
/// rejection and ends the run without deleting anything.
#[derive(Debug)]
pub enum FetchOutcome {
    Students(Vec<StudentRecord>),
    Rejected(StatusCode),
}

pub trait StudentApi {
    async fn fetch_all(&self) -> Result<FetchOutcome, Error>;

    /// The returned status is informational only.
    async fn delete_one(&self, id: &StudentId) -> Result<StatusCode, Error>;
}

pub struct HttpStudentApi {
    client: Client,
    base_url: Url,
}

impl HttpStudentApi {
    pub fn new(config: &ApiConfig) -> Result<Self, Error> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build().wrap_err("cannot build HTTP client")?,
            base_url: config.base_url()?,
        })
    }

    #[cfg(test)]
    fn with_client(client: Client, base_url: Url) -> Self {
        Self { client, base_url }
    }

    fn student_url(&self, id: &StudentId) -> Result<Url, Error> {
        student_url(&self.base_url, id)
    }
}

pub fn student_url(base_url: &Url, id: &StudentId) -> Result<Url, Error> {
    let mut url = base_url.clone();
    url.path_segments_mut()
        .map_err(|()| eyre!("base URL {base_url} cannot hold a student path"))?
        .pop_if_empty()
        .push(&id.to_string());
    Ok(url)
}

impl StudentApi for HttpStudentApi {
    async fn fetch_all(&self) -> Result<FetchOutcome, Error> {
        debug!(url = %self.base_url, "fetching students");
        let response = self
            .client
            .get(self.base_url.clone())
            .send()
            .await
            .wrap_err("cannot fetch students")?;
        let status = response.status();
        if status != StatusCode::OK {
            return Ok(FetchOutcome::Rejected(status));
        }
        let body = response
            .bytes()
            .await
            .wrap_err("cannot read student list")?;
        trace!(bytes = body.len(), "received student list");
        let students =
            serde_json::from_slice(&body).wrap_err("cannot decode student list")?;
        Ok(FetchOutcome::Students(students))
    }

    async fn delete_one(&self, id: &StudentId) -> Result<StatusCode, Error> {
        let url = self.student_url(id)?;
        let response = self
            .client
            .delete(url)
            .send()
            .await
            .wrap_err_with(|| format!("cannot delete student {id}"))?;
        Ok(response.status())
    }
}
