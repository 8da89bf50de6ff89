//! Common test utilities and fixtures for the console view tests

#![allow(dead_code, unreachable_pub, clippy::unwrap_used)]

use chrono::NaiveDate;
use gymdesk_client::mock::InMemoryBackend;
use gymdesk_console::{Confirm, MemberListView};
use gymdesk_core::{Member, MemberId, MemberStatus, PlanType, Result};
use std::cell::RefCell;
use std::sync::{Arc, Once};

static INIT_LOGGER: Once = Once::new();

/// Initialize test logging (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("debug")
            .with_test_writer()
            .try_init();
    });
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn member(id: &str, name: &str, status: MemberStatus, plan_type: PlanType) -> Member {
    Member {
        member_id: MemberId::new(id),
        name: name.to_string(),
        phone: format!("555-01{id:0>2}"),
        email: None,
        plan_type,
        status,
        start_date: date(2024, 1, 1),
        end_date: date(2024, 12, 31),
    }
}

/// Anna/Active, Anna/Expired, Bob/Active
pub fn roster() -> Vec<Member> {
    vec![
        member("1", "Anna Berg", MemberStatus::Active, PlanType::Monthly),
        member("2", "Anna Kovac", MemberStatus::Expired, PlanType::Quarterly),
        member("3", "Bob Stone", MemberStatus::Active, PlanType::Yearly),
    ]
}

pub fn backend() -> Arc<InMemoryBackend> {
    init_test_logging();
    Arc::new(
        InMemoryBackend::new()
            .with_members(roster())
            .with_user("admin", "hunter2", "tok-admin"),
    )
}

pub type TestListView = MemberListView<Arc<InMemoryBackend>, Arc<InMemoryBackend>>;

pub fn list_view(backend: &Arc<InMemoryBackend>) -> TestListView {
    MemberListView::new(Arc::clone(backend), Arc::clone(backend))
}

pub async fn mounted_list_view(backend: &Arc<InMemoryBackend>) -> TestListView {
    let mut view = list_view(backend);
    view.mount().await;
    view
}

pub fn names(members: &[Member]) -> Vec<&str> {
    members.iter().map(|m| m.name.as_str()).collect()
}

/// Confirm prompt that remembers the questions it was asked
pub struct RecordingConfirm {
    answer: bool,
    asked: RefCell<Vec<String>>,
}

impl RecordingConfirm {
    pub fn new(answer: bool) -> Self {
        Self {
            answer,
            asked: RefCell::new(Vec::new()),
        }
    }

    pub fn asked(&self) -> Vec<String> {
        self.asked.borrow().clone()
    }
}

impl Confirm for RecordingConfirm {
    fn confirm(&self, question: &str) -> Result<bool> {
        self.asked.borrow_mut().push(question.to_string());
        Ok(self.answer)
    }
}
