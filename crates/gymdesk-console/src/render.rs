//! Plain-text rendering of members, details and notices

use gymdesk_core::utils::format_date;
use gymdesk_core::{Member, MemberDetails};
use std::fmt::Write;

use crate::notice::{Notice, NoticeKind};

/// Text form for terminal output
pub trait Render {
    /// Render as printable text, ending with a newline
    fn render(&self) -> String;
}

impl Render for [Member] {
    fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{:>6}  {:<24}  {:<14}  {:<28}  {:<9}  {:<10}  {}",
            "ID", "Name", "Phone", "Email", "Plan", "End Date", "Status"
        );
        let _ = writeln!(out, "{:-<112}", "-");

        if self.is_empty() {
            let _ = writeln!(out, "No members found");
            return out;
        }

        for member in self {
            let _ = writeln!(
                out,
                "{:>6}  {:<24}  {:<14}  {:<28}  {:<9}  {:<10}  {}",
                member.member_id.as_str(),
                member.name,
                member.phone,
                member.email().unwrap_or("-"),
                member.plan_type.as_str(),
                format_date(member.end_date),
                member.status.as_str(),
            );
        }
        out
    }
}

impl Render for Member {
    fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Name:\t\t{}", self.name);
        let _ = writeln!(out, "Phone:\t\t{}", self.phone);
        let _ = writeln!(out, "Email:\t\t{}", self.email().unwrap_or("N/A"));
        let _ = writeln!(out, "Current Plan:\t{}", self.plan_type);
        let _ = writeln!(out, "Status:\t\t{}", self.status);
        let _ = writeln!(
            out,
            "Membership:\t{} to {}",
            format_date(self.start_date),
            format_date(self.end_date)
        );
        out
    }
}

impl Render for MemberDetails {
    fn render(&self) -> String {
        let mut out = String::new();

        if let Some(member) = &self.member {
            let _ = writeln!(out, "{} ({})", member.name, member.member_id);
            let _ = writeln!(out);
            let _ = writeln!(out, "Member Info");
            out.push_str(&member.render());
        }

        let _ = writeln!(out);
        let _ = writeln!(out, "Membership History");
        if self.membership_history.is_empty() {
            let _ = writeln!(out, "No membership history available.");
        }
        for entry in &self.membership_history {
            let _ = writeln!(
                out,
                "  {:<9}  {} to {}  {}",
                entry.plan_type.as_str(),
                format_date(entry.start_date),
                format_date(entry.end_date),
                entry.status
            );
        }

        let _ = writeln!(out);
        let _ = writeln!(out, "Attendance Log");
        if self.attendance_history.is_empty() {
            let _ = writeln!(out, "No attendance records available.");
        }
        for record in &self.attendance_history {
            let _ = writeln!(
                out,
                "  {}  {}",
                record.check_time.format("%Y-%m-%d"),
                record.check_time.format("%H:%M:%S")
            );
        }
        out
    }
}

impl Render for Notice {
    fn render(&self) -> String {
        let prefix = match self.kind {
            NoticeKind::Success => "ok",
            NoticeKind::Error => "error",
        };
        format!("[{prefix}] {}\n", self.message)
    }
}
