use rand::seq::{IndexedRandom, SliceRandom};
use rand::Rng;
use uuid::Uuid;

use crate::error::GameError;
use crate::models::{CandidateItem, Criteria, GameData, Tag};

/// One playable round: the item to guess and the shuffled options for all categories.
#[derive(Debug, Clone)]
pub struct RoundData {
    pub item: CandidateItem,
    pub tags: Vec<Tag>,
}

/// Picks the round's item uniformly from the pool and builds one correct option plus up to
/// `decoys_per_category` decoys for each category.
pub fn generate_round<R>(
    data: &GameData,
    decoys_per_category: usize,
    rng: &mut R,
) -> Result<RoundData, GameError>
where
    R: Rng + ?Sized,
{
    let item = data
        .raw_data
        .choose(rng)
        .ok_or_else(|| GameError::DataUnavailable("item pool is empty".to_string()))?
        .clone();

    let mut tags = Vec::with_capacity(Criteria::ALL.len() * (decoys_per_category + 1));

    for criteria in Criteria::ALL {
        let correct_raw = item.raw_value(criteria);
        let correct_answer = criteria.format_value(&correct_raw);

        tags.push(Tag {
            id: Uuid::new_v4().to_string(),
            value: correct_answer.clone(),
            criteria,
            is_correct: true,
            correct_answer: correct_answer.clone(),
        });

        for decoy in decoy_values(data, criteria, &correct_raw, decoys_per_category, rng) {
            tags.push(Tag {
                id: Uuid::new_v4().to_string(),
                value: criteria.format_value(&decoy),
                criteria,
                is_correct: false,
                correct_answer: correct_answer.clone(),
            });
        }
    }

    tags.shuffle(rng);

    tracing::debug!(
        "Generated round for token {} with {} options",
        item.token_id,
        tags.len()
    );

    Ok(RoundData { item, tags })
}

fn decoy_values<R>(
    data: &GameData,
    criteria: Criteria,
    correct: &str,
    limit: usize,
    rng: &mut R,
) -> Vec<String>
where
    R: Rng + ?Sized,
{
    let mut pool: Vec<String> = data
        .distinct_values(criteria)
        .into_iter()
        .filter(|value| value != correct)
        .collect();
    pool.shuffle(rng);
    pool.truncate(limit);
    pool
}
