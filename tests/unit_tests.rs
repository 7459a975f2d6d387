// Unit tests for Lume Match

use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;

use lume_match::core::{
    canonicalize, check_eligibility, parse_user_id, shared_interest_count, DateRange, Ranker, RankerLimits,
};
use lume_match::models::{Gender, Intent, User};
use lume_match::MatchError;

fn create_user(id: i64, gender: Option<Gender>, intent: Intent, interests: &[&str]) -> User {
    User {
        id,
        display_name: format!("User {}", id),
        gender,
        intent,
        interests: interests.iter().map(|s| s.to_string()).collect(),
        date_of_birth: None,
        description: None,
        pictures: vec![],
        match_count: 0,
        created_at: Utc::now(),
    }
}

#[test]
fn test_canonicalize_is_symmetric() {
    for a in 1..20 {
        for b in 1..20 {
            if a == b {
                assert!(matches!(canonicalize(a, b), Err(MatchError::SelfReference)));
            } else {
                let pair = canonicalize(a, b).unwrap();
                assert_eq!(pair, canonicalize(b, a).unwrap());
                assert!(pair.low() < pair.high());
            }
        }
    }
}

#[test]
fn test_identifier_parsing() {
    assert_eq!(parse_user_id(Some("12")).unwrap(), 12);
    assert!(matches!(parse_user_id(Some("0")), Err(MatchError::InvalidIdentifier(_))));
    assert!(matches!(parse_user_id(Some("twelve")), Err(MatchError::InvalidIdentifier(_))));
}

#[test]
fn test_eligibility_matrix() {
    let genders = [Some(Gender::Male), Some(Gender::Female), Some(Gender::Other), None];
    let intents = [Intent::Dating, Intent::Marriage];

    for ga in genders {
        for gb in genders {
            for ia in intents {
                for ib in intents {
                    let a = create_user(1, ga, ia, &[]);
                    let b = create_user(2, gb, ib, &[]);
                    let opposite = matches!(
                        (ga, gb),
                        (Some(Gender::Male), Some(Gender::Female)) | (Some(Gender::Female), Some(Gender::Male))
                    );
                    let expected = opposite && ia == ib;
                    assert_eq!(
                        check_eligibility(&a, &b).is_ok(),
                        expected,
                        "{:?}/{:?} {:?}/{:?}",
                        ga,
                        gb,
                        ia,
                        ib
                    );
                }
            }
        }
    }
}

#[test]
fn test_ranking_non_increasing() {
    let ranker = Ranker::new(RankerLimits { pool_size: 100, max_results: 20 });
    let tags = ["hiking", "music", "chess", "cooking", "yoga"];
    let pool: Vec<User> = (0..80)
        .map(|i| {
            let interests: Vec<&str> = tags.iter().copied().take(i % (tags.len() + 1)).collect();
            create_user(100 + i as i64, Some(Gender::Female), Intent::Dating, &interests)
        })
        .collect();
    let seed: Vec<String> = ["music", "chess", "yoga"].iter().map(|s| s.to_string()).collect();

    for s in 0..5 {
        let ranked = ranker.rank(&seed, pool.clone(), &mut StdRng::seed_from_u64(s));
        assert!(ranked.len() <= 20);
        for w in ranked.windows(2) {
            assert!(w[0].score >= w[1].score, "scores out of order");
        }
        // Top 20 of 80 always includes every candidate sharing all three tags
        assert_eq!(ranked[0].score, 3);
    }
}

#[test]
fn test_shared_interest_count() {
    let seed: HashSet<&str> = ["hiking", "music"].into_iter().collect();
    let interests = vec!["music".to_string(), "chess".to_string(), "hiking".to_string()];
    assert_eq!(shared_interest_count(&seed, &interests), 2);
    assert_eq!(shared_interest_count(&seed, &[]), 0);
}

#[test]
fn test_date_range_bounds() {
    assert!(DateRange::parse(Some("2024-01-01"), Some("2024-12-31")).unwrap().is_some());
    assert!(matches!(
        DateRange::parse(Some("2024-12-31"), Some("2024-01-01")),
        Err(MatchError::InvalidRange(_))
    ));
    assert!(matches!(DateRange::parse(Some("not-a-date"), None), Err(MatchError::InvalidRange(_))));
}
