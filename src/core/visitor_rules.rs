//! Normalization and validation of visitor input. Pure functions, no I/O.

use crate::models::visitor::VisitorDraft;
use regex::Regex;
use std::sync::LazyLock;

static DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]+$").expect("valid regex"));
static MASONIC_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9.-]+$").expect("valid regex"));

const NAME_MIN: usize = 3;
const NAME_MAX: usize = 120;
const LODGE_MIN: usize = 2;
const LODGE_MAX: usize = 120;
const LODGE_NUMBER_MAX: usize = 10;
const MASONIC_NUMBER_MAX: usize = 20;

fn collapse(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Trim and collapse inner whitespace on free-text fields. The degree is only
/// trimmed; an empty masonic number becomes `None`.
pub fn normalize(draft: &VisitorDraft) -> VisitorDraft {
    VisitorDraft {
        name: collapse(&draft.name),
        degree: draft.degree.trim().to_string(),
        lodge: collapse(&draft.lodge),
        lodge_number: collapse(&draft.lodge_number),
        obedience: collapse(&draft.obedience),
        masonic_number: draft
            .masonic_number
            .as_deref()
            .map(collapse)
            .filter(|n| !n.is_empty()),
    }
}

/// Every violated rule, in field order. Empty means the draft is acceptable.
pub fn validate(draft: &VisitorDraft) -> Vec<String> {
    let mut errors = Vec::new();

    let name_len = draft.name.chars().count();
    if name_len < NAME_MIN {
        errors.push(format!(
            "Nome do visitante precisa ter pelo menos {NAME_MIN} caracteres."
        ));
    } else if name_len > NAME_MAX {
        errors.push(format!(
            "Nome do visitante deve ter no maximo {NAME_MAX} caracteres."
        ));
    }

    let lodge_len = draft.lodge.chars().count();
    if lodge_len < LODGE_MIN {
        errors.push(format!(
            "Nome da loja precisa ter pelo menos {LODGE_MIN} caracteres."
        ));
    } else if lodge_len > LODGE_MAX {
        errors.push(format!("Nome da loja deve ter no maximo {LODGE_MAX} caracteres."));
    }

    if draft.lodge_number.is_empty() {
        errors.push("Numero da loja e obrigatorio.".to_string());
    } else {
        if !DIGITS.is_match(&draft.lodge_number) {
            errors.push("Numero da loja deve conter apenas digitos.".to_string());
        }
        if draft.lodge_number.chars().count() > LODGE_NUMBER_MAX {
            errors.push(format!(
                "Numero da loja deve ter no maximo {LODGE_NUMBER_MAX} digitos."
            ));
        }
    }

    if draft.obedience.is_empty() {
        errors.push("Obediencia e obrigatoria.".to_string());
    }

    if let Some(number) = &draft.masonic_number {
        if !MASONIC_NUMBER.is_match(number) {
            errors.push("Numero maconico deve conter apenas digitos, ponto ou hifen.".to_string());
        }
        if number.chars().count() > MASONIC_NUMBER_MAX {
            errors.push(format!(
                "Numero maconico deve ter no maximo {MASONIC_NUMBER_MAX} caracteres."
            ));
        }
    }

    errors
}
