use crate::api::{FetchOutcome, StudentApi};
use crate::dedup::find_duplicates;
use crate::display::{display_deletion, display_dry_run, display_duplicate, display_fetch_failure};
use eyre::Error;
use std::io::Write;
use tracing::{debug, info, instrument, warn};

/// What a cleanup run did.
#[derive(Debug, Default, Eq, PartialEq)]
pub struct Report {
    pub fetched: usize,
    pub retained: usize,
    pub duplicates: usize,
    pub deleted: usize,
    pub fetch_rejected: bool,
}

pub struct Deduplicator<A> {
    api: A,
    dry_run: bool,
}

impl<A: StudentApi> Deduplicator<A> {
    pub fn new(api: A, dry_run: bool) -> Self {
        Self { api, dry_run }
    }

    /// Fetch every student, then delete, one request at a time, every student
    /// whose tag was already seen earlier in the list. A rejected fetch ends
    /// the run cleanly; transport and decoding errors are returned.
    #[instrument(skip_all, fields(dry_run = self.dry_run))]
    pub async fn run(&self, out: &mut impl Write) -> Result<Report, Error> {
        let students = match self.api.fetch_all().await? {
            FetchOutcome::Students(students) => students,
            FetchOutcome::Rejected(status) => {
                warn!(%status, "student list request rejected");
                display_fetch_failure(out)?;
                return Ok(Report {
                    fetch_rejected: true,
                    ..Report::default()
                });
            }
        };
        let found = find_duplicates(&students)?;
        for d in &found.duplicates {
            display_duplicate(out, d)?;
        }
        let mut deleted = 0;
        for id in found.ids() {
            if self.dry_run {
                display_dry_run(out, &id)?;
                continue;
            }
            display_deletion(out, &id)?;
            let status = self.api.delete_one(&id).await?;
            debug!(%id, %status, "delete request sent");
            deleted += 1;
        }
        let report = Report {
            fetched: students.len(),
            retained: found.retained_tags.len(),
            duplicates: found.duplicates.len(),
            deleted,
            fetch_rejected: false,
        };
        info!(
            fetched = report.fetched,
            retained = report.retained,
            duplicates = report.duplicates,
            deleted = report.deleted,
            "cleanup finished"
        );
        Ok(report)
    }
}
