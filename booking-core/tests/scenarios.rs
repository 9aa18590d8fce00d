//! Reference scenarios for the room allocator.

use booking_core::{Money, OptimizationResult, TierResult, optimize};

fn eur(euros: i64, cents: i64) -> Money {
    Money::new(euros, cents).unwrap()
}

fn client_offers() -> Vec<Money> {
    vec![
        eur(23, 0),
        eur(45, 0),
        eur(155, 0),
        eur(374, 0),
        eur(22, 0),
        eur(99, 99),
        eur(100, 0),
        eur(101, 0),
        eur(115, 0),
        eur(209, 0),
    ]
}

fn expect(premium: (usize, Money), economy: (usize, Money)) -> OptimizationResult {
    OptimizationResult {
        premium: TierResult {
            booked_rooms: premium.0,
            total_income: premium.1,
        },
        economy: TierResult {
            booked_rooms: economy.0,
            total_income: economy.1,
        },
    }
}

#[test]
fn no_offers_books_nothing() {
    let result = optimize(5, 3, &[]).unwrap();
    assert_eq!(
        result,
        expect((0, Money::zero()), (0, Money::zero()))
    );
}

#[test]
fn three_premium_three_economy() {
    let result = optimize(3, 3, &client_offers()).unwrap();
    assert_eq!(result, expect((3, eur(738, 0)), (3, eur(167, 99))));
}

#[test]
fn spare_premium_rooms_stay_empty_when_economy_has_room() {
    let result = optimize(7, 5, &client_offers()).unwrap();
    assert_eq!(result, expect((6, eur(1054, 0)), (4, eur(189, 99))));
}

#[test]
fn surplus_high_offers_are_rejected() {
    let result = optimize(2, 7, &client_offers()).unwrap();
    assert_eq!(result, expect((2, eur(583, 0)), (4, eur(189, 99))));
}

#[test]
fn best_economy_offer_is_upgraded_into_spare_premium_room() {
    let result = optimize(7, 1, &client_offers()).unwrap();
    assert_eq!(result, expect((7, eur(1153, 99)), (1, eur(45, 0))));
}

#[test]
fn input_order_does_not_change_the_result() {
    let mut offers = client_offers();
    let forward = optimize(7, 1, &offers).unwrap();

    offers.reverse();
    assert_eq!(optimize(7, 1, &offers).unwrap(), forward);

    offers.rotate_left(3);
    assert_eq!(optimize(7, 1, &offers).unwrap(), forward);
}

#[test]
fn equal_prices_are_interchangeable() {
    let offers = vec![eur(50, 0); 4];
    let result = optimize(1, 2, &offers).unwrap();

    // two fill economy, the overflow upgrades into the premium room, one is rejected
    assert_eq!(result, expect((1, eur(50, 0)), (2, eur(100, 0))));
}

#[test]
fn cents_accumulate_exactly() {
    let offers = vec![eur(0, 1); 250];
    let result = optimize(0, 250, &offers).unwrap();

    assert_eq!(result.economy.booked_rooms, 250);
    assert_eq!(result.economy.total_income, eur(2, 50));
}

#[test]
fn offers_near_the_money_limit_sum_exactly() {
    let offers = [Money::from_euros(u64::MAX), Money::from_euros(1)];
    let result = optimize(2, 0, &offers).unwrap();

    assert_eq!(result.premium.booked_rooms, 2);
    assert_eq!(result.premium.total_income.euros(), u64::MAX as u128 + 1);
    assert_eq!(result.premium.total_income.cents(), 0);
    assert_eq!(result.economy, TierResult::default());
}
