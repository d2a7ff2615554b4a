mod report;
mod status;
mod submission;

pub use report::{
    duration_label, parse_rows, parse_timestamp, NewReport, ParsedReports, Report, ReportRow,
    RowRejection, StatusUpdate,
};
pub use status::{title_case, ReportStatus, StatusField, StatusVocabulary};
pub use submission::{InvalidTransition, SubmissionSession, SubmissionStage};
