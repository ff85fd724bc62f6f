//! Quartile-based employment policy
//!
//! Firms are ranked by their last recorded daily revenue. Firms below the
//! first quartile lay off workers, firms above the third quartile post
//! vacancies, everybody in between stands still. Both counts scale with
//! `ceil(ln(revenue + 1))`.

use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::economy::labor_market::{JobPosting, LaborMarket};
use crate::economy::registry::Registry;
use crate::economy::types::{FirmId, PersonId};

/// First and third quartile of a revenue cross-section.
///
/// Uses the sorted values at indices `floor(n/4)` and `floor(3n/4)`,
/// clamped to the slice. Returns `None` for an empty slice.
pub fn revenue_quartiles(revenues: &[f64]) -> Option<(f64, f64)> {
    if revenues.is_empty() {
        return None;
    }
    let mut sorted = revenues.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let last = sorted.len() - 1;
    let q1 = sorted[(sorted.len() / 4).min(last)];
    let q3 = sorted[(3 * sorted.len() / 4).min(last)];
    Some((q1, q3))
}

fn log_scale(revenue: f64) -> u32 {
    (revenue.max(0.0) + 1.0).ln().ceil() as u32
}

/// Workers a firm below Q1 lets go: at least one, never more than it has
pub fn layoff_count(revenue: f64, employees: usize) -> usize {
    (log_scale(revenue) as usize).max(1).min(employees)
}

/// Vacancies a firm above Q3 posts
pub fn vacancy_count(revenue: f64) -> u32 {
    log_scale(revenue)
}

/// Revenue of every active firm, in id order
fn revenue_cross_section(registry: &Registry) -> Vec<(FirmId, f64)> {
    registry.firms().map(|f| (f.id, f.last_revenue())).collect()
}

fn quartiles_of(cross_section: &[(FirmId, f64)]) -> Option<(f64, f64)> {
    let revenues: Vec<f64> = cross_section.iter().map(|&(_, r)| r).collect();
    revenue_quartiles(&revenues)
}

/// Lay off workers at firms whose revenue is below Q1.
///
/// Returns the fired workers; each is unlinked through the registry and
/// starts searching again.
pub fn fire_underperformers<R: Rng>(registry: &mut Registry, rng: &mut R) -> Vec<PersonId> {
    let cross_section = revenue_cross_section(registry);
    let (q1, _) = match quartiles_of(&cross_section) {
        Some(q) => q,
        None => return Vec::new(),
    };

    let mut fired = Vec::new();
    for (firm_id, revenue) in cross_section {
        if revenue >= q1 {
            continue;
        }
        let mut staff: Vec<PersonId> = match registry.firm(firm_id) {
            Some(firm) => firm.employees().iter().copied().collect(),
            None => continue,
        };
        staff.shuffle(rng);

        let count = layoff_count(revenue, staff.len());
        for &worker in staff.iter().take(count) {
            if registry.fire(worker).is_some() {
                fired.push(worker);
            }
        }
        debug!("{} (revenue {:.2} < Q1 {:.2}) fired {}", firm_id, revenue, q1, count);
    }
    fired
}

/// Post vacancies for firms whose revenue is above Q3. Returns the number
/// of vacancies posted.
pub fn post_vacancies(registry: &Registry, labor: &mut LaborMarket) -> u32 {
    let cross_section = revenue_cross_section(registry);
    let (_, q3) = match quartiles_of(&cross_section) {
        Some(q) => q,
        None => return 0,
    };

    let mut posted = 0;
    for (firm_id, revenue) in cross_section {
        if revenue <= q3 {
            continue;
        }
        let vacancies = vacancy_count(revenue);
        labor.post(JobPosting::new(firm_id, vacancies));
        posted += vacancies;
    }
    posted
}

/// Spread the opening vacancies round-robin over the firms, one posting
/// per firm. Returns the number of vacancies posted.
pub fn post_initial_offers(registry: &Registry, labor: &mut LaborMarket, total: usize) -> u32 {
    let firms: Vec<FirmId> = registry.firms().map(|f| f.id).collect();
    if firms.is_empty() || total == 0 {
        return 0;
    }

    let mut per_firm = vec![0u32; firms.len()];
    for i in 0..total {
        per_firm[i % firms.len()] += 1;
    }

    let mut posted = 0;
    for (firm_id, vacancies) in firms.into_iter().zip(per_firm) {
        if vacancies > 0 {
            labor.post(JobPosting::new(firm_id, vacancies));
            posted += vacancies;
        }
    }
    posted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::economy::firm::Firm;
    use crate::economy::person::Person;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    /// Four firms with ten workers each and the given last revenues
    fn ranked_firms(revenues: [f64; 4]) -> Registry {
        let mut registry = Registry::new();
        for revenue in revenues {
            let fid = registry.next_firm_id();
            let mut firm = Firm::new(fid, 100.0, 0.0, 5.0, 2.0);
            firm.add_sale(revenue, 1.0);
            firm.close_cycle();
            registry.insert_firm(firm);
            for _ in 0..10 {
                let pid = registry.next_person_id();
                registry.insert_person(Person::new(pid, 0.0, 0, 1000));
                registry.hire(pid, fid, 5.0);
            }
        }
        registry
    }

    #[test]
    fn test_quartile_indices() {
        assert_eq!(revenue_quartiles(&[]), None);
        assert_eq!(revenue_quartiles(&[3.0]), Some((3.0, 3.0)));
        assert_eq!(revenue_quartiles(&[40.0, 10.0, 30.0, 20.0]), Some((20.0, 40.0)));
        assert_eq!(revenue_quartiles(&[5.0, 1.0, 4.0, 2.0, 3.0, 6.0, 7.0, 8.0]), Some((3.0, 7.0)));
    }

    #[test]
    fn test_counts_scale_with_log_revenue() {
        assert_eq!(vacancy_count(0.0), 0);
        assert_eq!(vacancy_count(1.0), 1);
        assert_eq!(vacancy_count(20.0), 4);
        assert_eq!(layoff_count(0.0, 10), 1);
        assert_eq!(layoff_count(1000.0, 3), 3);
        assert_eq!(layoff_count(5.0, 0), 0);
    }

    #[test]
    fn test_low_revenue_firm_fires_within_staff() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut registry = ranked_firms([2.0, 20.0, 30.0, 60.0]);

        let fired = fire_underperformers(&mut registry, &mut rng);
        assert!((1..=10).contains(&fired.len()));
        assert_eq!(registry.firm(FirmId(0)).unwrap().employee_count(), 10 - fired.len());
        for worker in &fired {
            let person = registry.person(*worker).unwrap();
            assert_eq!(person.employer(), None);
            assert!(person.is_searching());
        }
        // Nobody else is touched
        assert_eq!(registry.firm(FirmId(1)).unwrap().employee_count(), 10);
        assert!(registry.links_consistent());
    }

    #[test]
    fn test_high_revenue_firm_posts() {
        let registry = ranked_firms([2.0, 20.0, 30.0, 60.0]);
        let mut labor = LaborMarket::new();
        // Q3 is the top value of four, so nobody is strictly above it
        assert_eq!(post_vacancies(&registry, &mut labor), 0);

        let mut registry = ranked_firms([2.0, 20.0, 30.0, 60.0]);
        let fid = registry.next_firm_id();
        let mut star = Firm::new(fid, 100.0, 0.0, 5.0, 2.0);
        star.add_sale(500.0, 1.0);
        star.close_cycle();
        registry.insert_firm(star);

        // Five firms: Q3 at index 3 (60.0); only the 500.0 firm is above
        let posted = post_vacancies(&registry, &mut labor);
        assert!(posted >= 1);
        assert_eq!(labor.postings().len(), 1);
        assert_eq!(labor.postings()[0].firm, fid);
        assert!(labor.postings()[0].recruiting);
    }

    #[test]
    fn test_flat_revenues_do_nothing() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut registry = ranked_firms([10.0; 4]);
        let mut labor = LaborMarket::new();
        assert!(fire_underperformers(&mut registry, &mut rng).is_empty());
        assert_eq!(post_vacancies(&registry, &mut labor), 0);
    }

    #[test]
    fn test_initial_offers_round_robin() {
        let registry = ranked_firms([1.0, 1.0, 1.0, 1.0]);
        let mut labor = LaborMarket::new();
        assert_eq!(post_initial_offers(&registry, &mut labor, 10), 10);
        let vacancies: Vec<u32> = labor.postings().iter().map(|p| p.vacancies).collect();
        assert_eq!(vacancies, vec![3, 3, 2, 2]);
    }
}
