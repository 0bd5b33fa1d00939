//! Shared fixtures for integration tests: portal page HTML in the shape the
//! real portal renders, plus a canned portal client.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::BTreeMap;

use academia_backend::models::EnrolledCourse;
use academia_backend::scrape::{
    Credentials, PortalClient, PortalError, PortalPage, ScrapeSession,
};

pub const EMAIL: &str = "ab1234@university.edu";
pub const REGISTRATION: &str = "RA2011003010042";

/// The personal-details block shared by both pages.
fn personal_details_block(batch: &str) -> String {
    format!(
        r#"<table>
            <tr><td>Name:</td><td>A. Student</td></tr>
            <tr><td>Registration Number:</td><td><strong>{REGISTRATION}</strong></td></tr>
            <tr><td>Program:</td><td>B.Tech</td></tr>
            <tr><td>Batch:</td><td>{batch}</td></tr>
        </table>"#
    )
}

/// A timetable page for cohort `batch` with a representative course mix:
/// an alternation slot, plain theory slots, and both lab slot spellings.
pub fn timetable_page(batch: &str) -> String {
    format!(
        r#"<html><body>
        {details}
        <table class="course_tbl">
            <tr><th>S.No</th><th>Course Code</th><th>Course Title</th><th>Credit</th>
                <th>Course Type</th><th>Faculty Name</th><th>Slot</th><th>GCR Code</th><th>Room No.</th></tr>
            <tr><td>1</td><td>18CSC302J</td><td>DAA</td><td>4</td><td>Theory</td>
                <td>Dr. A</td><td>A/X</td><td>gcr-daa</td><td>TP101</td></tr>
            <tr><td>2</td><td>18CSC303J</td><td>Operating Systems</td><td>4</td><td>Theory</td>
                <td>Dr. B</td><td>B</td><td>gcr-os</td><td>TP102</td></tr>
            <tr><td>3</td><td>18CSL301L</td><td>Networks Lab</td><td>2</td><td>Practical</td>
                <td>Dr. C</td><td>P6-P7-</td><td>gcr-nwl</td><td>LAB1</td></tr>
            <tr><td>4</td><td>18CSL302L</td><td>Compiler Lab</td><td>2</td><td>Practical</td>
                <td>Dr. D</td><td>P26-27-28-</td><td>gcr-cpl</td><td>LAB2</td></tr>
            <tr><td>5</td><td>18PDH101T</td><td>Soft Skills</td><td>3</td><td>Theory</td>
                <td>Dr. E</td><td>G</td><td>gcr-ss</td><td>TP103</td></tr>
        </table>
        </body></html>"#,
        details = personal_details_block(batch),
    )
}

/// An attendance page with the attendance table and the nested marks table.
pub fn attendance_page() -> String {
    format!(
        r#"<html><body>
        {details}
        <table>
            <tr><th>Course Code</th><th>Course Title</th><th>Category</th><th>Faculty Name</th>
                <th>Slot</th><th>Hours Conducted</th><th>Hours Absent</th><th>Attn %</th></tr>
            <tr><td>18CSC302J</td><td>Design and Analysis of Algorithms</td><td>PC</td><td>Dr. A</td>
                <td>A/X</td><td>40</td><td>4</td><td>90.00</td></tr>
            <tr><td>18CSL301L</td><td>Networks Lab</td><td>PC</td><td>Dr. C</td>
                <td>P6-P7-</td><td>12</td><td>0</td><td>100.00</td></tr>
        </table>
        <table>
            <tr><th>Course Code</th><th>Course Title</th><th>Test Performance</th></tr>
            <tr><td>18CSC302J</td><td>DAA</td>
                <td><table><tr>
                    <td><strong>CLA-1/25.00</strong><br>21.50</td>
                    <td><strong>CLA-2/25.00</strong><br>Abs</td>
                </tr></table></td></tr>
        </table>
        </body></html>"#,
        details = personal_details_block("1"),
    )
}

/// The course list `timetable_page` renders, as extraction should see it.
pub fn expected_courses() -> Vec<EnrolledCourse> {
    let course = |code: &str, title: &str, slot: &str, faculty: &str, room: &str, ctype: &str, gcr: &str| {
        EnrolledCourse {
            code: code.into(),
            title: title.into(),
            slot_code: slot.into(),
            faculty: faculty.into(),
            room: room.into(),
            course_type: ctype.into(),
            secondary_code: gcr.into(),
        }
    };
    vec![
        course("18CSC302J", "DAA", "A/X", "Dr. A", "TP101", "Theory", "gcr-daa"),
        course("18CSC303J", "Operating Systems", "B", "Dr. B", "TP102", "Theory", "gcr-os"),
        course("18CSL301L", "Networks Lab", "P6-P7-", "Dr. C", "LAB1", "Practical", "gcr-nwl"),
        course("18CSL302L", "Compiler Lab", "P26-27-28-", "Dr. D", "LAB2", "Practical", "gcr-cpl"),
        course("18PDH101T", "Soft Skills", "G", "Dr. E", "TP103", "Theory", "gcr-ss"),
    ]
}

/// A portal client serving canned pages, with switchable failure modes.
pub struct StaticPortalClient {
    pub timetable_html: String,
    pub attendance_html: String,
    pub reject_credentials: bool,
    pub session_expired: bool,
}

impl StaticPortalClient {
    pub fn new() -> Self {
        Self {
            timetable_html: timetable_page("1"),
            attendance_html: attendance_page(),
            reject_credentials: false,
            session_expired: false,
        }
    }

    pub fn with_batch(batch: &str) -> Self {
        Self {
            timetable_html: timetable_page(batch),
            ..Self::new()
        }
    }
}

#[async_trait]
impl PortalClient for StaticPortalClient {
    async fn login(&self, credentials: &Credentials) -> Result<ScrapeSession, PortalError> {
        if self.reject_credentials {
            return Err(PortalError::LoginFailed("invalid credentials".into()));
        }
        let cookies: BTreeMap<String, String> = [
            ("JSESSIONID", "fixture-session"),
            ("iamcsr", "fixture-csr"),
            ("CT_CSRF_TOKEN", "fixture-csrf"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        Ok(ScrapeSession::new(credentials.email.clone(), cookies))
    }

    async fn fetch_page(
        &self,
        _session: &ScrapeSession,
        page: PortalPage,
    ) -> Result<String, PortalError> {
        if self.session_expired {
            return Err(PortalError::SessionExpired);
        }
        Ok(match page {
            PortalPage::Timetable => self.timetable_html.clone(),
            PortalPage::Attendance => self.attendance_html.clone(),
        })
    }
}
