use chrono::{Local, Months, NaiveDate};
use models::{FinancialData, FinancialSnapshot};
use rand::Rng;
use std::collections::BTreeMap;

pub const CHASE_BANK: &str = "Chase Bank Co.";
pub const BANK_OF_AMERICA: &str = "Bank of America";
pub const AMERICAN_EXPRESS: &str = "American Express";
pub const CHASE_FREEDOM_FLEX: &str = "Chase Freedom Flex";

/// Smallest share the first account of a split receives.
const MIN_FIRST_SHARE: i64 = 100;
const HISTORY_LEN: usize = 6;
const PAYMENT_MONTHS: u8 = 6;

/// Anything able to produce a financial snapshot for a connect action.
pub trait FinancialDataSource: Send + Sync {
    fn generate(&self) -> FinancialSnapshot;

    /// Placeholder balance for the non-native wallet asset (BTC), as a decimal string.
    fn alternate_asset_balance(&self) -> String;
}

/// Mock source sampling every figure uniformly at random.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomFinancialDataGenerator;

impl FinancialDataSource for RandomFinancialDataGenerator {
    fn generate(&self) -> FinancialSnapshot {
        generate_with(&mut rand::thread_rng(), Local::now().date_naive())
    }

    fn alternate_asset_balance(&self) -> String {
        sample_btc_balance(&mut rand::thread_rng())
    }
}

/// Samples one snapshot from `rng`, dating the due date relative to `today`.
pub fn generate_with<R: Rng + ?Sized>(rng: &mut R, today: NaiveDate) -> FinancialSnapshot {
    let total_bank_balance = rng.gen_range(2000..=3000);
    let (chase_balance, boa_balance) = split_balance(rng, total_bank_balance);

    let bank_accounts = BTreeMap::from([
        (CHASE_BANK.to_string(), chase_balance),
        (BANK_OF_AMERICA.to_string(), boa_balance),
    ]);

    let (credit_cards, total_card_balance) = if rng.gen_bool(0.5) {
        // Single card, below the bank total
        let total = total_bank_balance - rng.gen_range(500..=750);
        (BTreeMap::from([(AMERICAN_EXPRESS.to_string(), total)]), total)
    } else {
        let total = total_bank_balance + rng.gen_range(1000..=1500);
        let (amex_balance, freedom_balance) = split_balance(rng, total);
        let cards = BTreeMap::from([
            (AMERICAN_EXPRESS.to_string(), amex_balance),
            (CHASE_FREEDOM_FLEX.to_string(), freedom_balance),
        ]);
        (cards, total)
    };

    let financial_data = sample_financial_data(rng, today, total_bank_balance, total_card_balance);

    FinancialSnapshot {
        bank_accounts,
        total_bank_balance,
        credit_cards,
        total_card_balance,
        financial_data,
    }
}

fn sample_financial_data<R: Rng + ?Sized>(
    rng: &mut R,
    today: NaiveDate,
    total_bank_balance: i64,
    total_card_balance: i64,
) -> FinancialData {
    let due_date = today
        .checked_add_months(Months::new(rng.gen_range(1..=3)))
        .unwrap_or(today);
    let total_credit_limit = rng.gen_range(5000..=10000);
    let interest_rate = (rng.gen_range(20.0..30.0_f64) * 100.0).round() / 100.0;

    let credit_rating = if total_bank_balance > total_card_balance {
        rng.gen_range(700..=850)
    } else {
        rng.gen_range(550..=699)
    };

    let credit_card_balance_history = (0..HISTORY_LEN)
        .map(|_| rng.gen_range(1000..=total_credit_limit))
        .collect();

    let on_time_payments = rng.gen_range(1..=PAYMENT_MONTHS);
    let late_payments = PAYMENT_MONTHS - on_time_payments;

    // Sampled independently of credit_rating
    let credit_score_history = (0..HISTORY_LEN).map(|_| rng.gen_range(550..=850)).collect();

    let suggested_budget = (total_bank_balance as f64 * 0.8).floor() as i64;

    FinancialData {
        due_date,
        total_credit_limit,
        interest_rate,
        credit_rating,
        credit_card_balance_history,
        on_time_payments,
        late_payments,
        credit_score_history,
        suggested_budget,
    }
}

/// Splits `total` into two positive shares, the first in `[100, total - 1]`.
/// Totals too small for the 100 floor are split over `[1, total - 1]` instead.
pub fn split_balance<R: Rng + ?Sized>(rng: &mut R, total: i64) -> (i64, i64) {
    let first = if total > MIN_FIRST_SHARE {
        rng.gen_range(MIN_FIRST_SHARE..total)
    } else if total > 1 {
        rng.gen_range(1..total)
    } else {
        total
    };
    (first, total - first)
}

/// Placeholder BTC balance in `[0, 1)`, eight decimals.
pub fn sample_btc_balance<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!("{:.8}", rng.gen::<f64>())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 31).unwrap()
    }

    fn snapshots(count: usize) -> Vec<FinancialSnapshot> {
        let mut rng = StdRng::seed_from_u64(42);
        (0..count).map(|_| generate_with(&mut rng, today())).collect()
    }

    #[test]
    fn test_bank_accounts_sum_to_total() {
        for s in snapshots(500) {
            assert!((2000..=3000).contains(&s.total_bank_balance));
            assert_eq!(s.bank_accounts.len(), 2);
            let chase = s.bank_accounts[CHASE_BANK];
            let boa = s.bank_accounts[BANK_OF_AMERICA];
            assert!(chase >= 100 && boa > 0);
            assert_eq!(chase + boa, s.total_bank_balance);
        }
    }

    #[test]
    fn test_card_scenarios() {
        let mut single = 0;
        let mut double = 0;
        for s in snapshots(500) {
            let sum: i64 = s.credit_cards.values().sum();
            assert_eq!(sum, s.total_card_balance);
            match s.credit_cards.len() {
                1 => {
                    single += 1;
                    let gap = s.total_bank_balance - s.total_card_balance;
                    assert!((500..=750).contains(&gap));
                }
                2 => {
                    double += 1;
                    let gap = s.total_card_balance - s.total_bank_balance;
                    assert!((1000..=1500).contains(&gap));
                    assert!(s.credit_cards.values().all(|v| *v > 0));
                }
                n => panic!("unexpected card count {}", n),
            }
        }
        assert!(single > 0 && double > 0);
    }

    #[test]
    fn test_rating_band_follows_balance_comparison() {
        for s in snapshots(500) {
            let rating = s.financial_data.credit_rating;
            if s.total_bank_balance > s.total_card_balance {
                assert!((700..=850).contains(&rating));
            } else {
                assert!((550..=699).contains(&rating));
            }
        }
    }

    #[test]
    fn test_auxiliary_fields_stay_in_range() {
        for s in snapshots(500) {
            let d = &s.financial_data;
            assert_eq!(d.on_time_payments + d.late_payments, 6);
            assert!((1..=6).contains(&d.on_time_payments));
            assert!((5000..=10000).contains(&d.total_credit_limit));
            assert!((20.0..=30.0).contains(&d.interest_rate));
            assert_eq!((d.interest_rate * 100.0).round() / 100.0, d.interest_rate);
            assert_eq!(d.credit_card_balance_history.len(), 6);
            assert!(d
                .credit_card_balance_history
                .iter()
                .all(|v| (1000..=d.total_credit_limit).contains(v)));
            assert_eq!(d.credit_score_history.len(), 6);
            assert!(d.credit_score_history.iter().all(|v| (550..=850).contains(v)));
            assert_eq!(d.suggested_budget, (s.total_bank_balance as f64 * 0.8).floor() as i64);
        }
    }

    #[test]
    fn test_due_date_is_one_to_three_months_out() {
        let allowed = [
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
            NaiveDate::from_ymd_opt(2024, 4, 30).unwrap(),
        ];
        for s in snapshots(100) {
            assert!(allowed.contains(&s.financial_data.due_date));
        }
    }

    #[test]
    fn test_split_guards_small_totals() {
        let mut rng = StdRng::seed_from_u64(7);
        for total in [2, 50, 100, 101] {
            for _ in 0..50 {
                let (a, b) = split_balance(&mut rng, total);
                assert!(a > 0 && b > 0, "total {} split into {} + {}", total, a, b);
                assert_eq!(a + b, total);
            }
        }
    }

    #[test]
    fn test_btc_placeholder_format() {
        let mut rng = StdRng::seed_from_u64(1);
        let btc = sample_btc_balance(&mut rng);
        let value: f64 = btc.parse().unwrap();
        assert!((0.0..=1.0).contains(&value));
        assert_eq!(btc.split('.').nth(1).map(str::len), Some(8));
    }

    #[test]
    fn test_random_source_produces_consistent_snapshot() {
        let s = RandomFinancialDataGenerator.generate();
        assert_eq!(s.bank_accounts.values().sum::<i64>(), s.total_bank_balance);
        let btc: f64 = RandomFinancialDataGenerator.alternate_asset_balance().parse().unwrap();
        assert!((0.0..=1.0).contains(&btc));
    }
}
