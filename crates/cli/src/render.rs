//! Plain-text and JSON rendering for the terminal.

use std::fmt::Write as _;

use grimoire_client::ViewUpdate;
use grimoire_core::contact::FieldError;
use grimoire_core::grouping::SpellGroups;
use grimoire_core::quiz::{QuestionRecord, QuizResult};
use grimoire_core::CharacterView;
use grimoire_events::Notification;
use serde::Serialize;
use tokio::sync::broadcast;

pub fn view_update(update: &ViewUpdate, json: bool) -> anyhow::Result<()> {
    match update {
        ViewUpdate::Characters { items, .. } if json => print_json(items),
        ViewUpdate::Characters { items, sort } => {
            println!("Sort: {}", sort.button_label());
            print!("{}", character_grid(items));
            Ok(())
        }
        ViewUpdate::Details(view) if json => print_json(view),
        ViewUpdate::Details(view) => {
            print!("{}", character_details(view));
            Ok(())
        }
        ViewUpdate::Spells(groups) if json => print_json(groups),
        ViewUpdate::Spells(groups) => {
            print!("{}", spell_accordion(groups));
            Ok(())
        }
        ViewUpdate::Unchanged => Ok(()),
    }
}

pub fn questions(questions: &[QuestionRecord], json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(&questions);
    }
    let mut out = String::new();
    for (i, q) in questions.iter().enumerate() {
        let _ = writeln!(out, "{}. {}", i + 1, q.question);
        for option in &q.options {
            let _ = writeln!(out, "   - {option}");
        }
    }
    print!("{out}");
    Ok(())
}

pub fn quiz_result(result: &QuizResult, json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(result);
    }
    print!("{}", quiz_summary(result));
    Ok(())
}

pub fn field_errors(errors: &[FieldError]) {
    for err in errors {
        eprintln!("{}: {}", err.field, err.message);
    }
}

/// Print whatever the bus collected during the command.
pub fn drain_notifications(rx: &mut broadcast::Receiver<Notification>) {
    while let Ok(notification) = rx.try_recv() {
        eprintln!("{}", notification_line(&notification));
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// ---- text layouts ----

fn character_grid(items: &[CharacterView]) -> String {
    if items.is_empty() {
        return "No characters found.\n".into();
    }
    let mut out = String::new();
    for view in items {
        let _ = writeln!(out, "{:<12} {:<28} {}", view.id, view.title, view.subtitle);
    }
    out
}

fn character_details(view: &CharacterView) -> String {
    let mut out = format!("{}\n{}\n", view.title, view.subtitle);
    for field in &view.detail_fields {
        let _ = writeln!(out, "  {}: {}", field.label, field.value);
    }
    let _ = writeln!(out, "  Image: {}", view.image_url);
    out
}

fn spell_accordion(groups: &SpellGroups) -> String {
    if groups.is_empty() {
        return "No spells found.\n".into();
    }
    let mut out = String::new();
    for (category, spells) in groups {
        let _ = writeln!(out, "{category} ({})", spells.len());
        for spell in spells {
            let _ = writeln!(out, "  {}: {}", spell.name, spell.description);
        }
    }
    out
}

fn quiz_summary(result: &QuizResult) -> String {
    let mut out = format!("Score: {}/{}\n", result.score, result.total);
    for detail in &result.details {
        let mark = if detail.is_correct { "+" } else { "x" };
        let _ = writeln!(
            out,
            "[{mark}] {} (yours: {}, correct: {})",
            detail.question, detail.selected, detail.correct_answer
        );
    }
    out
}

fn notification_line(notification: &Notification) -> String {
    match &notification.detail {
        Some(detail) => format!("[{:?}] {} ({detail})", notification.kind, notification.message),
        None => format!("[{:?}] {}", notification.kind, notification.message),
    }
}

#[cfg(test)]
mod tests {
    use grimoire_core::quiz::{fallback_questions, score_quiz};
    use grimoire_core::{group_by_category, to_view_model, CharacterRecord, SpellRecord};
    use grimoire_events::NotificationKind;

    use super::*;

    #[test]
    fn empty_grid_says_so() {
        assert_eq!(character_grid(&[]), "No characters found.\n");
    }

    #[test]
    fn details_list_every_field() {
        let mut record = CharacterRecord::new("char-0", "Luna Lovegood", "Ravenclaw");
        record.patronus = "Hare".into();
        let text = character_details(&to_view_model(&record));
        assert!(text.starts_with("Luna Lovegood\nRavenclaw\n"));
        assert!(text.contains("  Patronus: Hare\n"));
    }

    #[test]
    fn accordion_keeps_category_order() {
        let groups = group_by_category(&[
            SpellRecord::new("Lumos", "Light", "utility"),
            SpellRecord::new("Stupefy", "Stuns", "combat"),
        ]);
        let text = spell_accordion(&groups);
        assert!(text.find("utility (1)").unwrap() < text.find("combat (1)").unwrap());
    }

    #[test]
    fn quiz_summary_marks_answers() {
        let questions = fallback_questions();
        let answers = vec![Some(questions[0].answer.clone()), None];
        let text = quiz_summary(&score_quiz(&questions, &answers));
        assert!(text.starts_with(&format!("Score: 1/{}\n", questions.len())));
        assert!(text.contains("[+]"));
        assert!(text.contains("yours: No answer"));
    }

    #[test]
    fn notification_line_includes_detail() {
        let n = Notification::new(NotificationKind::Transport, "Could not load characters")
            .with_detail("HTTP 503");
        assert_eq!(
            notification_line(&n),
            "[Transport] Could not load characters (HTTP 503)"
        );
    }
}
