use skill_core::validation::{PasswordCriterion, StrengthLabel, check_password};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CriterionVm {
    pub label: &'static str,
    pub met: bool,
}

/// Live strength meter shown under the sign-up password field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StrengthMeterVm {
    pub score: u8,
    pub label: StrengthLabel,
    pub criteria: Vec<CriterionVm>,
}

impl StrengthMeterVm {
    #[must_use]
    pub fn css_class(&self) -> &'static str {
        match self.label {
            StrengthLabel::Weak => "strength strength--weak",
            StrengthLabel::Fair => "strength strength--fair",
            StrengthLabel::Good => "strength strength--good",
            StrengthLabel::Strong => "strength strength--strong",
        }
    }

    /// Width of the meter bar in percent.
    #[must_use]
    pub fn fill_percent(&self) -> u8 {
        let total = u8::try_from(PasswordCriterion::ALL.len()).unwrap_or(u8::MAX);
        self.score.saturating_mul(100) / total.max(1)
    }
}

/// `None` until the learner typed something.
#[must_use]
pub fn strength_meter(password: &str) -> Option<StrengthMeterVm> {
    if password.is_empty() {
        return None;
    }
    let strength = check_password(password);
    let criteria = PasswordCriterion::ALL
        .into_iter()
        .map(|criterion| CriterionVm {
            label: criterion.describe(),
            met: !strength.missing().contains(&criterion),
        })
        .collect();
    Some(StrengthMeterVm {
        score: strength.score(),
        label: strength.label(),
        criteria,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_password_hides_meter() {
        assert!(strength_meter("").is_none());
    }

    #[test]
    fn meter_lists_every_criterion() {
        let meter = strength_meter("abcdefgh").unwrap();
        assert_eq!(meter.criteria.len(), PasswordCriterion::ALL.len());
        assert_eq!(meter.criteria.iter().filter(|c| c.met).count(), 2);
        assert_eq!(meter.label, StrengthLabel::Weak);
        assert_eq!(meter.fill_percent(), 40);
    }

    #[test]
    fn strong_password_fills_meter() {
        let meter = strength_meter("Penguin#42").unwrap();
        assert_eq!(meter.label, StrengthLabel::Strong);
        assert_eq!(meter.fill_percent(), 100);
        assert_eq!(meter.css_class(), "strength strength--strong");
    }
}
