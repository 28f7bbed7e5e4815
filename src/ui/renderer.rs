//! Plain-text renderer.
//!
//! Turns a [`ListViewModel`] into a block of text: header, counters, summary
//! line, one card per visible student and the pagination bar. The renderer
//! only reads the view model; every decision was made when it was computed.

use super::style::Style;
use super::viewmodel::{ListViewModel, StudentCard};
use crate::app::Notification;
use std::fmt::Write;

const RULE_WIDTH: usize = 60;

/// Renders the student screen.
#[must_use]
pub fn render(vm: &ListViewModel, style: &Style) -> String {
    let mut out = String::new();

    let title = style.bold(&vm.header.title);
    match &vm.header.user_label {
        Some(user) => {
            let _ = writeln!(out, "{title}  {}", style.dim(user));
        }
        None => {
            let _ = writeln!(out, "{title}");
        }
    }

    if let Some(stats) = &vm.stats {
        let _ = writeln!(
            out,
            "Students: {} | Active: {} | Classes: {}",
            stats.total_students, stats.active_students, stats.total_classes
        );
    }

    let mut summary = format!("{} | {}", vm.results_label, vm.sort_label);
    if !vm.active_filters.is_empty() {
        let filters: Vec<String> = vm
            .active_filters
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect();
        let _ = write!(summary, " | Filters: {}", filters.join(", "));
    }
    let _ = writeln!(out, "{summary}");
    let _ = writeln!(out, "{}", "-".repeat(RULE_WIDTH));

    if vm.loading {
        let _ = writeln!(out, "{}", style.dim("Loading..."));
    }

    if let Some(empty) = &vm.empty_state {
        let _ = writeln!(out, "{}", style.bold(&empty.message));
        let _ = writeln!(out, "{}", style.dim(&empty.subtitle));
    } else {
        for card in &vm.cards {
            render_card(&mut out, card, style);
        }
        let _ = writeln!(out, "{}", "-".repeat(RULE_WIDTH));
        let prev = if vm.pagination.prev_enabled { "< Prev" } else { "" };
        let next = if vm.pagination.next_enabled { "Next >" } else { "" };
        let _ = writeln!(out, "{prev:<8}{:^44}{next:>8}", vm.pagination.label);
    }

    if let Some(modal) = &vm.modal_title {
        let _ = writeln!(out, "[{modal}]");
    }

    out
}

fn render_card(out: &mut String, card: &StudentCard, style: &Style) {
    let name = style.highlighted(&card.name, &card.highlight);
    let _ = writeln!(
        out,
        "#{:<4} {name}  {}  {}  {}",
        card.id,
        card.age_label,
        style.status(card.status),
        card.class_label
    );

    let contact: Vec<&str> = [card.email.as_deref(), card.phone.as_deref()]
        .into_iter()
        .flatten()
        .collect();
    if !contact.is_empty() {
        let _ = writeln!(out, "      {}", style.dim(&contact.join(" | ")));
    }

    let mut actions = vec!["details", "edit"];
    if card.can_enroll {
        actions.push("enroll");
    }
    if card.can_delete {
        actions.push("delete");
    }
    let _ = writeln!(out, "      {}", style.dim(&actions.join(" ")));
}

/// Renders a notification as a single line.
#[must_use]
pub fn render_notification(notification: &Notification, style: &Style) -> String {
    style.notification(notification.level, &notification.message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::StudentStatus;
    use crate::ui::viewmodel::{EmptyState, HeaderInfo, PaginationBar};

    fn viewmodel(cards: Vec<StudentCard>) -> ListViewModel {
        ListViewModel {
            header: HeaderInfo {
                title: "Students".to_string(),
                user_label: Some("secretaria".to_string()),
            },
            stats: None,
            results_label: format!("{} students found", cards.len()),
            sort_label: "Sorted by nome (asc)".to_string(),
            active_filters: vec![("status".to_string(), "ativo".to_string())],
            pagination: PaginationBar {
                label: "Page 1 of 1".to_string(),
                prev_enabled: false,
                next_enabled: false,
            },
            empty_state: cards.is_empty().then(|| EmptyState {
                message: "No students found".to_string(),
                subtitle: "Try adjusting the search or filters".to_string(),
            }),
            cards,
            modal_title: None,
            loading: false,
        }
    }

    #[test]
    fn card_lists_allowed_actions() {
        let card = StudentCard {
            id: 7,
            name: "Ana".to_string(),
            highlight: vec![0],
            age_label: "9 years".to_string(),
            status: StudentStatus::Inactive,
            class_label: "No class".to_string(),
            email: Some("ana@escola.br".to_string()),
            phone: None,
            can_enroll: true,
            can_delete: false,
        };
        let text = render(&viewmodel(vec![card]), &Style::plain());

        assert!(text.contains("#7    [A]na  9 years  inativo  No class"));
        assert!(text.contains("ana@escola.br"));
        assert!(text.contains("details edit enroll\n"));
        assert!(text.contains("Filters: status=ativo"));
        assert!(text.contains("Page 1 of 1"));
    }

    #[test]
    fn empty_state_replaces_cards_and_pagination() {
        let text = render(&viewmodel(vec![]), &Style::plain());
        assert!(text.contains("No students found"));
        assert!(!text.contains("Page"));
    }
}
