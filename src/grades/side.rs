//! Side (外格): head of the family name plus tail of the given name.

use super::types::{Derivation, SideForm, SideGrade, Term};

fn head(family: &[Term]) -> Vec<Term> {
    match family {
        [] => Vec::new(),
        [_] => vec![Term::ghost()],
        [first, _] => vec![*first],
        [first, second, ..] => vec![*first, *second],
    }
}

fn essence_tail(given: &[Term]) -> Vec<Term> {
    match given {
        [] => Vec::new(),
        [_] => vec![Term::ghost()],
        [.., last] => vec![*last],
    }
}

fn surface_tail(given: &[Term]) -> Vec<Term> {
    match given {
        [] => Vec::new(),
        [only] => vec![*only, Term::ghost()],
        [.., second_last, last] => vec![*second_last, *last],
    }
}

fn join(mut head: Vec<Term>, tail: Vec<Term>) -> Derivation {
    head.extend(tail);
    Derivation::from_terms(head)
}

pub(crate) fn side_grade(family: &[Term], given: &[Term]) -> SideGrade {
    let head = head(family);

    if family.len() >= 3 {
        let tail = if given.len() >= 3 {
            surface_tail(given)
        } else {
            essence_tail(given)
        };
        let derivation = join(head, tail);
        return SideGrade {
            value: derivation.total,
            derivation,
            form: SideForm::Single,
        };
    }

    let essence = join(head.clone(), essence_tail(given));
    let surface = join(head, surface_tail(given));
    // ties keep the essence formula
    let derivation = if surface.total > essence.total {
        surface.clone()
    } else {
        essence.clone()
    };

    SideGrade {
        value: derivation.total,
        derivation,
        form: SideForm::Split { essence, surface },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terms(values: &[u32]) -> Vec<Term> {
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| Term::char(char::from_u32(0x4E00 + i as u32).unwrap(), v))
            .collect()
    }

    #[test]
    fn test_long_family_long_given_is_single() {
        let side = side_grade(&terms(&[1, 2, 3]), &terms(&[4, 5, 6]));
        // head-2 (1 + 2) + tail-2 (5 + 6)
        assert_eq!(side.value, 14);
        assert_eq!(side.form, SideForm::Single);
        assert!(side.alternative().is_none());
    }

    #[test]
    fn test_long_family_short_given_uses_essence_tail() {
        let side = side_grade(&terms(&[1, 2, 3]), &terms(&[4, 5]));
        assert_eq!(side.value, 1 + 2 + 5);
        let side = side_grade(&terms(&[1, 2, 3]), &terms(&[9]));
        assert_eq!(side.value, 1 + 2 + 1);
        assert!(side.derivation.has_ghost());
    }

    #[test]
    fn test_split_takes_larger() {
        let side = side_grade(&terms(&[3, 4]), &terms(&[4, 7]));
        assert_eq!(side.essence().unwrap().total, 3 + 7);
        assert_eq!(side.surface().unwrap().total, 3 + 4 + 7);
        assert_eq!(side.value, 14);
        assert_eq!(side.alternative().unwrap().total, 10);
    }

    #[test]
    fn test_empty_everything_is_zero() {
        let side = side_grade(&[], &[]);
        assert_eq!(side.value, 0);
        assert!(side.alternative().is_none());
    }
}
