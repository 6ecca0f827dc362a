//! Scope comparison between two campaigns whose periods already overlap.
//!
//! | candidate \ existing | ORDER | CATEGORY | PRODUCT |
//! |----------------------|-------|----------|---------|
//! | ORDER                | always | -       | -       |
//! | CATEGORY             | -     | same id  | existing product in candidate category |
//! | PRODUCT              | -     | candidate product in existing category | shared ids |

use crate::catalog::ProductIndex;
use crate::conflict::Conflict;
use crate::model::{ApplyTarget, Campaign, CampaignRef, ScopeRef};

/// Compare the scopes of `candidate` and `existing`.
///
/// Does not look at dates or ids; the caller has already established that
/// the periods intersect and that the two are distinct records.
pub fn compare(candidate: &Campaign, existing: &Campaign, index: &ProductIndex) -> Option<Conflict> {
    let existing_ref = CampaignRef::from(existing);

    match (&candidate.target, &existing.target) {
        (ApplyTarget::Order, ApplyTarget::Order) => Some(Conflict::WholeOrder {
            existing: existing_ref,
        }),

        (ApplyTarget::Category(ours), ApplyTarget::Category(theirs)) => {
            (ours.id == theirs.id).then(|| Conflict::SameCategory {
                existing: existing_ref,
                category: theirs.label().to_string(),
            })
        }

        (ApplyTarget::Product(ours), ApplyTarget::Product(theirs)) => {
            let products: Vec<String> = ours
                .iter()
                .filter_map(|p| theirs.iter().find(|t| t.id == p.id))
                .map(|t| t.label().to_string())
                .collect();
            (!products.is_empty()).then(|| Conflict::SharedProducts {
                existing: existing_ref,
                products,
            })
        }

        (ApplyTarget::Category(ours), ApplyTarget::Product(theirs)) => {
            let hits: Vec<(&ScopeRef, &str)> = theirs
                .iter()
                .filter_map(|p| {
                    let info = index.in_category(&p.id, &ours.id)?;
                    Some((p, info.category_name.as_str()))
                })
                .collect();
            let (_, first_category) = hits.first()?;
            let category = pick(&[*first_category, ours.name.as_deref().unwrap_or("")], &ours.id);
            let products = hits
                .iter()
                .map(|(p, _)| {
                    let indexed = index.get(&p.id).map_or("", |i| i.product_name.as_str());
                    pick(&[p.name.as_deref().unwrap_or(""), indexed], &p.id)
                })
                .collect();
            Some(Conflict::CategoryViaProducts {
                existing: existing_ref,
                category,
                products,
            })
        }

        (ApplyTarget::Product(ours), ApplyTarget::Category(theirs)) => {
            let hits: Vec<(&ScopeRef, &str, &str)> = ours
                .iter()
                .filter_map(|p| {
                    let info = index.in_category(&p.id, &theirs.id)?;
                    Some((p, info.product_name.as_str(), info.category_name.as_str()))
                })
                .collect();
            let (_, _, indexed_category) = hits.first()?;
            let category = pick(
                &[theirs.name.as_deref().unwrap_or(""), *indexed_category],
                &theirs.id,
            );
            let products = hits
                .iter()
                .map(|(p, indexed_name, _)| pick(&[*indexed_name, p.label()], &p.id))
                .collect();
            Some(Conflict::ProductsInCategory {
                existing: existing_ref,
                category,
                products,
            })
        }

        _ => None,
    }
}

/// First non-blank candidate, else the fallback.
fn pick(candidates: &[&str], fallback: &str) -> String {
    candidates
        .iter()
        .find(|s| !s.trim().is_empty())
        .copied()
        .unwrap_or(fallback)
        .to_string()
}
