use chrono::{NaiveDate, TimeZone, Utc};
use finance_tracker::{
    core::{
        services::{
            AlertSeverity, AnalyticsService, CategoryService, NewTransaction, Prediction,
            TransactionService,
        },
        time::FixedClock,
    },
    errors::LedgerError,
    ledger::{Direction, Ledger, MonthKey, Transaction, TransactionId, TransactionKind},
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn clock() -> FixedClock {
    FixedClock(Utc.with_ymd_and_hms(2024, 3, 5, 8, 0, 0).unwrap())
}

fn march_ledger() -> (Ledger, MonthKey) {
    let ledger = Ledger::new(NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
    let month = ledger.current_month();
    (ledger, month)
}

fn month_transactions(ledger: &Ledger, month: MonthKey) -> impl Iterator<Item = &Transaction> {
    ledger
        .transactions()
        .iter()
        .filter(move |txn| txn.month == month)
}

fn month_total(ledger: &Ledger, month: MonthKey, kind: TransactionKind) -> Decimal {
    month_transactions(ledger, month)
        .filter(|txn| txn.kind == kind)
        .map(|txn| txn.amount)
        .sum()
}

/// Every month record must agree with the transaction log it was built from.
fn assert_consistent(ledger: &Ledger, step: &str) {
    for record in ledger.months().iter() {
        let month = record.key;
        assert_eq!(record.balance, record.income - record.expenses, "{step}: balance");
        assert_eq!(
            record.income,
            month_total(ledger, month, TransactionKind::Income),
            "{step}: income"
        );
        assert_eq!(
            record.expenses,
            month_total(ledger, month, TransactionKind::Expense),
            "{step}: expenses"
        );

        for entry in &record.categories {
            let counted: Decimal = month_transactions(ledger, month)
                .filter(|txn| txn.kind == TransactionKind::Expense && txn.counted)
                .filter(|txn| txn.category == entry.name)
                .map(|txn| txn.amount)
                .sum();
            assert!(entry.spent >= Decimal::ZERO, "{step}: {} spent", entry.name);
            assert_eq!(entry.spent, counted, "{step}: {} spent", entry.name);
        }
    }
}

/// Adding then removing one more expense must leave the ledger untouched.
fn assert_add_remove_is_identity(ledger: &Ledger, clock: &FixedClock, step: &str) {
    let mut scratch = ledger.clone();
    let month = scratch.current_month();
    let txn = TransactionService::add(
        &mut scratch,
        clock,
        NewTransaction::expense("LAZER", dec!(0.07), month),
    )
    .unwrap();
    TransactionService::remove(&mut scratch, txn.id).unwrap();
    assert_eq!(&scratch, ledger, "{step}: add/remove pair");
}

#[test]
fn expense_updates_totals_and_category() {
    let (mut ledger, month) = march_ledger();
    TransactionService::add(
        &mut ledger,
        &clock(),
        NewTransaction::expense("ALIMENTAÇÃO", dec!(50), month),
    )
    .unwrap();

    let record = ledger.month_record(month).unwrap();
    assert_eq!(record.expenses, dec!(50));
    assert_eq!(record.balance, dec!(-50));
    assert_eq!(record.category("ALIMENTAÇÃO").unwrap().spent, dec!(50));
}

#[test]
fn overspending_month_has_negative_savings_rate() {
    let (mut ledger, month) = march_ledger();
    let clock = clock();
    TransactionService::add(&mut ledger, &clock, NewTransaction::income("", dec!(1000), month))
        .unwrap();
    TransactionService::add(
        &mut ledger,
        &clock,
        NewTransaction::expense("MORADIA", dec!(1200), month),
    )
    .unwrap();

    let record = ledger.month_record(month).unwrap();
    assert_eq!(record.balance, dec!(-200));
    assert_eq!(AnalyticsService::savings_rate(record), -20.0);
}

#[test]
fn category_near_budget_raises_single_warning() {
    let (mut ledger, month) = march_ledger();
    CategoryService::add(&mut ledger, "Pets", dec!(100)).unwrap();
    TransactionService::add(
        &mut ledger,
        &clock(),
        NewTransaction::expense("pets", dec!(85), month),
    )
    .unwrap();

    let alerts = AnalyticsService::category_alerts(ledger.month_record(month).unwrap());
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].category, "PETS");
    assert_eq!(alerts[0].percentage, 85.0);
    assert_eq!(alerts[0].severity, AlertSeverity::Warning);
}

#[test]
fn average_spans_every_month_record() {
    let (mut ledger, march) = march_ledger();
    let clock = clock();
    let february = ledger.step_view(Direction::Previous);
    TransactionService::add(
        &mut ledger,
        &clock,
        NewTransaction::expense("LAZER", dec!(100), february),
    )
    .unwrap();
    TransactionService::add(
        &mut ledger,
        &clock,
        NewTransaction::expense("LAZER", dec!(300), march),
    )
    .unwrap();

    assert_eq!(
        AnalyticsService::average_monthly_expense(ledger.months()).unwrap(),
        dec!(200)
    );
}

#[test]
fn remove_is_inverse_of_add_on_month_with_history() {
    let (mut ledger, month) = march_ledger();
    let clock = clock();
    TransactionService::add(
        &mut ledger,
        &clock,
        NewTransaction::expense("LAZER", dec!(0.1), month),
    )
    .unwrap();
    let before = ledger.month_record(month).cloned().unwrap();

    let txn = TransactionService::add(
        &mut ledger,
        &clock,
        NewTransaction::expense("LAZER", dec!(0.2), month),
    )
    .unwrap();
    TransactionService::remove(&mut ledger, txn.id).unwrap();

    let after = ledger.month_record(month).unwrap();
    assert_eq!(after, &before);
    assert_eq!(after.category("LAZER").unwrap().spent, dec!(0.1));
}

#[test]
fn removing_expense_of_re_added_category_never_goes_negative() {
    let (mut ledger, month) = march_ledger();
    let clock = clock();
    CategoryService::add(&mut ledger, "PETS", dec!(50)).unwrap();
    let txn = TransactionService::add(
        &mut ledger,
        &clock,
        NewTransaction::expense("PETS", dec!(20), month),
    )
    .unwrap();
    CategoryService::remove(&mut ledger, "PETS").unwrap();
    CategoryService::add(&mut ledger, "PETS", dec!(50)).unwrap();

    TransactionService::remove(&mut ledger, txn.id).unwrap();

    let record = ledger.month_record(month).unwrap();
    assert_eq!(record.category("PETS").unwrap().spent, dec!(0));
    assert_eq!(record.expenses, dec!(0));
    assert_consistent(&ledger, "after removal");
}

#[test]
fn invariants_hold_across_mixed_command_sequence() {
    let (mut ledger, march) = march_ledger();
    let clock = clock();
    let february = ledger.step_view(Direction::Previous);
    let check = |ledger: &Ledger, step: &str| {
        assert_consistent(ledger, step);
        assert_add_remove_is_identity(ledger, &clock, step);
    };
    let add = |ledger: &mut Ledger, input: NewTransaction| {
        TransactionService::add(ledger, &clock, input).unwrap().id
    };

    check(&ledger, "start");
    add(&mut ledger, NewTransaction::income("", dec!(1000.00), march));
    check(&ledger, "income");
    let small = add(&mut ledger, NewTransaction::expense("LAZER", dec!(0.1), march));
    check(&ledger, "small expense");
    add(&mut ledger, NewTransaction::expense("lazer", dec!(0.2), february));
    check(&ledger, "expense in other month");

    CategoryService::add(&mut ledger, "PETS", dec!(50)).unwrap();
    check(&ledger, "add category");
    let old_pets = add(&mut ledger, NewTransaction::expense("PETS", dec!(20.35), march));
    check(&ledger, "custom category expense");
    let untracked = add(&mut ledger, NewTransaction::expense("VIAGEM", dec!(12.5), march));
    check(&ledger, "untracked category expense");

    CategoryService::update_budget(&mut ledger, "LAZER", dec!(250)).unwrap();
    check(&ledger, "budget change");
    CategoryService::remove(&mut ledger, "PETS").unwrap();
    check(&ledger, "remove category");
    CategoryService::add(&mut ledger, "PETS", dec!(40)).unwrap();
    check(&ledger, "re-add category");
    add(&mut ledger, NewTransaction::expense("PETS", dec!(5), march));
    check(&ledger, "expense on re-added category");

    TransactionService::remove(&mut ledger, old_pets).unwrap();
    check(&ledger, "remove expense of dropped category");
    TransactionService::remove(&mut ledger, small).unwrap();
    check(&ledger, "remove small expense");
    add(&mut ledger, NewTransaction::income("", dec!(0.3), february));
    check(&ledger, "income in other month");
    TransactionService::remove(&mut ledger, untracked).unwrap();
    check(&ledger, "remove untracked expense");

    let record = ledger.month_record(march).unwrap();
    assert_eq!(record.category("PETS").unwrap().spent, dec!(5));
    assert_eq!(record.expenses, dec!(5));
    assert_eq!(record.balance, dec!(995.00));
}

#[test]
fn duplicate_category_is_rejected_without_changes() {
    let (mut ledger, _) = march_ledger();
    let before = ledger.clone();
    assert_eq!(
        CategoryService::add(&mut ledger, "outros", dec!(10)),
        Err(LedgerError::DuplicateCategory("OUTROS".into()))
    );
    assert_eq!(ledger, before);
}

#[test]
fn removing_unknown_transaction_is_not_found() {
    let (mut ledger, _) = march_ledger();
    let err = TransactionService::remove(&mut ledger, TransactionId(123)).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn prediction_flags_month_above_average() {
    let (mut ledger, march) = march_ledger();
    let clock = clock();
    let february = ledger.step_view(Direction::Previous);
    TransactionService::add(
        &mut ledger,
        &clock,
        NewTransaction::expense("LAZER", dec!(10), february),
    )
    .unwrap();
    TransactionService::add(
        &mut ledger,
        &clock,
        NewTransaction::expense("LAZER", dec!(190), march),
    )
    .unwrap();

    // average 100, current 190
    assert_eq!(
        AnalyticsService::predict_current(&ledger).unwrap(),
        Prediction::AboveAverage
    );
}
