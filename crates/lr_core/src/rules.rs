//! Evaluation of the `rules` lists attached to libraries and arguments.

use crate::{
    json::version::{Rule, RuleAction},
    Platform,
};

/// Whether `rules` allow something on `platform`.
///
/// Every rule naming an OS or architecture votes:
/// - if either differs from the platform, the vote is "is this a disallow rule"
/// - if either matches, the vote is "is this an allow rule"
///
/// A rule may cast both votes. The result is allowed when nobody voted,
/// otherwise when any vote was `true`. Rules without an OS or
/// architecture abstain, and any rule mentioning launcher features
/// makes the whole list disallowed.
#[must_use]
pub fn evaluate(rules: &[Rule], platform: &Platform) -> bool {
    let mut votes = Vec::new();

    for rule in rules {
        if rule.features.is_some() {
            return false;
        }

        let os_name = rule.os.as_ref().and_then(|os| os.name.as_deref());
        let os_arch = rule.os.as_ref().and_then(|os| os.arch.as_deref());
        if os_name.is_none() && os_arch.is_none() {
            continue;
        }

        let name_matches = os_name == Some(platform.os.as_str());
        let arch_matches = os_arch == Some(platform.arch.as_str());

        if !arch_matches || !name_matches {
            votes.push(rule.action == RuleAction::Disallow);
        }
        if arch_matches || name_matches {
            votes.push(rule.action == RuleAction::Allow);
        }
    }

    votes.is_empty() || votes.contains(&true)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::{json::version::RuleOs, Arch, OsName};

    const LINUX: Platform = Platform {
        os: OsName::Linux,
        arch: Arch::X64,
    };
    const WINDOWS: Platform = Platform {
        os: OsName::Windows,
        arch: Arch::X64,
    };
    const WINDOWS_32: Platform = Platform {
        os: OsName::Windows,
        arch: Arch::X86,
    };
    const OSX: Platform = Platform {
        os: OsName::Osx,
        arch: Arch::Arm64,
    };

    fn rule(action: RuleAction, name: Option<&str>, arch: Option<&str>) -> Rule {
        Rule {
            action,
            os: Some(RuleOs {
                name: name.map(str::to_owned),
                arch: arch.map(str::to_owned),
                version: None,
            }),
            features: None,
        }
    }

    #[test]
    fn empty_list_is_allowed() {
        assert!(evaluate(&[], &LINUX));
    }

    #[test]
    fn allow_single_os() {
        let rules = [rule(RuleAction::Allow, Some("windows"), None)];
        assert!(evaluate(&rules, &WINDOWS));
        assert!(!evaluate(&rules, &LINUX));
        assert!(!evaluate(&rules, &OSX));
    }

    #[test]
    fn disallow_other_os_is_allowed() {
        // Mismatching name votes `true` for a disallow rule.
        let rules = [rule(RuleAction::Disallow, Some("linux"), None)];
        assert!(evaluate(&rules, &WINDOWS));
        // On linux the missing arch still mismatches and votes `true`.
        assert!(evaluate(&rules, &LINUX));
    }

    #[test]
    fn allow_then_disallow_osx() {
        let rules = [
            Rule {
                action: RuleAction::Allow,
                os: None,
                features: None,
            },
            rule(RuleAction::Disallow, Some("osx"), None),
        ];
        assert!(evaluate(&rules, &LINUX));
        assert!(evaluate(&rules, &OSX));
    }

    #[test]
    fn arch_rules() {
        let rules = [rule(RuleAction::Allow, None, Some("x86"))];
        assert!(evaluate(&rules, &WINDOWS_32));
        assert!(!evaluate(&rules, &WINDOWS));

        let rules = [rule(RuleAction::Allow, Some("windows"), Some("x86"))];
        assert!(evaluate(&rules, &WINDOWS_32));
        assert!(evaluate(&rules, &WINDOWS));
        assert!(!evaluate(&rules, &LINUX));
    }

    #[test]
    fn rules_without_os_abstain() {
        let rules = [Rule {
            action: RuleAction::Disallow,
            os: Some(RuleOs {
                version: Some("^10\\.".to_owned()),
                ..Default::default()
            }),
            features: None,
        }];
        assert!(evaluate(&rules, &WINDOWS));
    }

    #[test]
    fn features_are_never_satisfied() {
        let rules = [
            rule(RuleAction::Allow, Some("linux"), None),
            Rule {
                action: RuleAction::Allow,
                os: None,
                features: Some(BTreeMap::from([(
                    "has_custom_resolution".to_owned(),
                    serde_json::Value::Bool(true),
                )])),
            },
        ];
        assert!(!evaluate(&rules, &LINUX));
    }
}
