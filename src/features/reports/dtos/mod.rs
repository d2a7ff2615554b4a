mod report_dto;
mod submission_dto;

pub use report_dto::{ReportImage, ReportResponseDto, SubmitReportDto, SubmitReportForm};
pub use submission_dto::{stage_message, SubmissionResponseDto};
