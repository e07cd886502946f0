//! Multi-criteria investor scoring and ranking.

use serde::Serialize;

use crate::investors::{Investor, InvestorCatalog};

/// Canonical scoring weights. Experience is weighted higher than breadth
/// of portfolio; the pair must sum to 1 and is overridable in config.
pub const DEFAULT_EXPERIENCE_WEIGHT: f64 = 0.6;
pub const DEFAULT_COMPANIES_WEIGHT: f64 = 0.4;

/// Weight pair for the raw investor score.
#[derive(Debug, Clone, Copy)]
pub struct ScoringWeights {
    pub experience: f64,
    pub companies: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            experience: DEFAULT_EXPERIENCE_WEIGHT,
            companies: DEFAULT_COMPANIES_WEIGHT,
        }
    }
}

/// An investor together with its scores for the current query.
///
/// `scaled_score` is normalized against the maximum raw score of the
/// current filtered set only; re-running with a different filter changes
/// the scale.
#[derive(Debug, Clone, Serialize)]
pub struct InvestorMatch {
    #[serde(flatten)]
    pub investor: Investor,
    pub raw_score: f64,
    pub scaled_score: f64,
}

/// Outcome of a ranking query. An empty filtered set is an expected,
/// non-exceptional outcome and is therefore not an error.
#[derive(Debug)]
pub enum RankOutcome {
    Matches(Vec<InvestorMatch>),
    NoMatch { domain: String },
}

#[derive(Debug, thiserror::Error)]
pub enum RankError {
    #[error("selected domain cannot be empty")]
    EmptyDomain,
}

/// Rank investors for a domain, optionally narrowed by investor type.
///
/// Domain filtering is a case-insensitive substring test against each
/// record's free-form domains string. That tolerates compound strings like
/// "FinTech, AI & ML" but also lets "AI" match any label containing "ai";
/// the imprecision is known and kept for compatibility.
pub fn rank(
    catalog: &InvestorCatalog,
    domain: &str,
    investor_type: Option<&str>,
    weights: ScoringWeights,
) -> Result<RankOutcome, RankError> {
    let domain = domain.trim();
    if domain.is_empty() {
        return Err(RankError::EmptyDomain);
    }

    let domain_lower = domain.to_lowercase();
    let type_lower = investor_type
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase);

    let filtered: Vec<&Investor> = catalog
        .investors()
        .iter()
        .filter(|inv| inv.domains.to_lowercase().contains(&domain_lower))
        .filter(|inv| match &type_lower {
            Some(t) => inv.investor_type.to_lowercase().contains(t),
            None => true,
        })
        .collect();

    if filtered.is_empty() {
        log::debug!("no investors matched domain {domain:?}");
        return Ok(RankOutcome::NoMatch {
            domain: domain.to_string(),
        });
    }

    let mut matches: Vec<InvestorMatch> = filtered
        .into_iter()
        .map(|inv| {
            let raw = raw_score(inv, weights);
            InvestorMatch {
                investor: inv.clone(),
                raw_score: raw,
                scaled_score: 0.0,
            }
        })
        .collect();

    let max_raw = matches.iter().map(|m| m.raw_score).fold(0.0_f64, f64::max);
    for m in &mut matches {
        m.scaled_score = if max_raw > 0.0 {
            m.raw_score / max_raw * 100.0
        } else {
            0.0
        };
    }

    // Stable sort: equal raw scores keep catalog order
    matches.sort_by(|a, b| {
        b.raw_score
            .partial_cmp(&a.raw_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    Ok(RankOutcome::Matches(matches))
}

/// Weighted raw score, rounded to two decimals.
fn raw_score(investor: &Investor, weights: ScoringWeights) -> f64 {
    let score = investor.experience_years * weights.experience
        + f64::from(investor.companies_invested) * weights.companies;
    (score * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::investors::Funds;

    fn investor(id: u64, name: &str, domains: &str, exp: f64, count: u32, itype: &str) -> Investor {
        Investor {
            id,
            name: name.to_string(),
            company: "Acme Capital".to_string(),
            experience_years: exp,
            companies_invested: count,
            domains: domains.to_string(),
            linkedin_url: "Not Available".to_string(),
            email: "Not Available".to_string(),
            funds_available: Funds::Undisclosed,
            past_companies: "Unknown".to_string(),
            investor_type: itype.to_string(),
        }
    }

    fn sample_catalog() -> InvestorCatalog {
        InvestorCatalog::from_records(vec![
            investor(0, "Asha", "FinTech, AI & ML", 10.0, 5, "Angel"),
            investor(1, "Bruno", "Healthcare", 20.0, 2, "VC"),
            investor(2, "Chen", "fintech", 4.0, 12, "VC"),
            investor(3, "Dana", "EdTech", 8.0, 8, "Angel"),
        ])
    }

    #[test]
    fn test_empty_domain_rejected() {
        let catalog = sample_catalog();
        assert!(matches!(
            rank(&catalog, "  ", None, ScoringWeights::default()),
            Err(RankError::EmptyDomain)
        ));
    }

    #[test]
    fn test_substring_filter_is_case_insensitive() {
        let catalog = sample_catalog();
        let outcome = rank(&catalog, "FINTECH", None, ScoringWeights::default()).unwrap();
        match outcome {
            RankOutcome::Matches(matches) => {
                let names: Vec<&str> = matches.iter().map(|m| m.investor.name.as_str()).collect();
                assert!(names.contains(&"Asha"));
                assert!(names.contains(&"Chen"));
                assert_eq!(matches.len(), 2);
            }
            RankOutcome::NoMatch { .. } => panic!("expected matches"),
        }
    }

    #[test]
    fn test_investor_type_narrows_results() {
        let catalog = sample_catalog();
        let outcome =
            rank(&catalog, "FinTech", Some("vc"), ScoringWeights::default()).unwrap();
        match outcome {
            RankOutcome::Matches(matches) => {
                assert_eq!(matches.len(), 1);
                assert_eq!(matches[0].investor.name, "Chen");
            }
            RankOutcome::NoMatch { .. } => panic!("expected matches"),
        }
    }

    #[test]
    fn test_no_match_is_signal_not_error() {
        let catalog = sample_catalog();
        let outcome = rank(&catalog, "SpaceTech", None, ScoringWeights::default()).unwrap();
        assert!(matches!(outcome, RankOutcome::NoMatch { domain } if domain == "SpaceTech"));
    }

    #[test]
    fn test_empty_catalog_is_no_match() {
        let catalog = InvestorCatalog::from_records(vec![]);
        let outcome = rank(&catalog, "FinTech", None, ScoringWeights::default()).unwrap();
        assert!(matches!(outcome, RankOutcome::NoMatch { .. }));
    }

    #[test]
    fn test_scores_descending_and_top_scaled_to_100() {
        let catalog = sample_catalog();
        let outcome = rank(&catalog, "FinTech", None, ScoringWeights::default()).unwrap();
        let matches = match outcome {
            RankOutcome::Matches(m) => m,
            RankOutcome::NoMatch { .. } => panic!("expected matches"),
        };

        // Asha: 10*0.6 + 5*0.4 = 8.0; Chen: 4*0.6 + 12*0.4 = 7.2
        assert_eq!(matches[0].investor.name, "Asha");
        assert!((matches[0].raw_score - 8.0).abs() < 1e-9);
        assert!((matches[0].scaled_score - 100.0).abs() < 1e-9);
        assert!((matches[1].raw_score - 7.2).abs() < 1e-9);

        for pair in matches.windows(2) {
            assert!(pair[0].raw_score >= pair[1].raw_score);
        }
    }

    #[test]
    fn test_all_zero_scores_scale_to_zero() {
        let catalog = InvestorCatalog::from_records(vec![
            investor(0, "Zed", "FinTech", 0.0, 0, "Angel"),
            investor(1, "Yara", "FinTech", 0.0, 0, "VC"),
        ]);
        let outcome = rank(&catalog, "FinTech", None, ScoringWeights::default()).unwrap();
        match outcome {
            RankOutcome::Matches(matches) => {
                assert!(matches.iter().all(|m| m.scaled_score == 0.0));
            }
            RankOutcome::NoMatch { .. } => panic!("expected matches"),
        }
    }

    #[test]
    fn test_tie_keeps_catalog_order() {
        let catalog = InvestorCatalog::from_records(vec![
            investor(0, "First", "FinTech", 5.0, 5, "Angel"),
            investor(1, "Second", "FinTech", 5.0, 5, "VC"),
        ]);
        let outcome = rank(&catalog, "FinTech", None, ScoringWeights::default()).unwrap();
        match outcome {
            RankOutcome::Matches(matches) => {
                assert_eq!(matches[0].investor.name, "First");
                assert_eq!(matches[1].investor.name, "Second");
            }
            RankOutcome::NoMatch { .. } => panic!("expected matches"),
        }
    }
}
