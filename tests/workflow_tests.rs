//! End-to-end workflow scenarios over the pure business logic:
//! code minting, visibility scoping and transition validation,
//! exercised together the way the request handlers drive them.

use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;

use cargo_pos::models::consignment::{Consignment, ConsignmentStatus};
use cargo_pos::models::user::{Actor, User, UserRole};
use cargo_pos::models::voucher::{DeliveryType, PaymentMethod, Voucher, VoucherStatus};
use cargo_pos::services::codes::{format_consignment_code, format_voucher_code};
use cargo_pos::services::notes::{append_note, render_note_block};
use cargo_pos::services::transitions::{
    check_consignment_transition, check_voucher_transition, TransitionContext, TransitionPolicy,
};
use cargo_pos::services::visibility::{consignment_scope, voucher_scope};
use cargo_pos::utils::errors::AppError;
use cargo_pos::utils::validation::{ensure_driver, missing_ids};

fn actor(id: i64, role: UserRole, region_id: Option<i64>) -> Actor {
    Actor {
        id,
        username: format!("user{}", id),
        role,
        region_id,
    }
}

fn voucher(code: &str, status: VoucherStatus, origin: i64, dest: i64, created_by: i64) -> Voucher {
    Voucher {
        id: 1,
        code: code.to_string(),
        sender_name: "Aye Chan".to_string(),
        sender_phone: "0911223344".to_string(),
        sender_address: "12 Bogyoke Rd, Yangon".to_string(),
        receiver_name: "Lim Wei".to_string(),
        receiver_phone: "0122334455".to_string(),
        receiver_address: "8 Jalan Ampang, Kuala Lumpur".to_string(),
        weight_kg: Decimal::new(35, 1),
        currency: "MMK".to_string(),
        total_amount: Decimal::new(42000, 0),
        payment_method: PaymentMethod::CashOnDelivery,
        delivery_type: DeliveryType::HomeDelivery,
        status,
        notes: String::new(),
        origin_region_id: origin,
        destination_region_id: dest,
        consignment_id: None,
        driver_id: None,
        pod_image_path: None,
        created_by,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

/// Create voucher A->B as Pending; staff of A may move it, staff of an
/// unrelated region may not; an admin can force-set Delivered.
#[test]
fn voucher_lifecycle_scenario() {
    let policy = TransitionPolicy::permissive();
    let staff_a = actor(20, UserRole::Myanmar, Some(1));
    let staff_c = actor(22, UserRole::Malay, Some(9));
    let admin = actor(1, UserRole::Admin, None);

    // Creation: sequential codes out of the allocator
    let code = format_voucher_code("MAN", 1, 7).unwrap();
    assert_eq!(code, "MAN0000001");
    let mut v = voucher(&code, VoucherStatus::Pending, 1, 2, 100);

    // Pending: only origin-region staff may act
    let ctx = TransitionContext::bulk_update();
    let allowed =
        check_voucher_transition(&staff_a, &v, None, VoucherStatus::InTransit, &ctx, &policy);
    assert!(allowed.allowed);

    let denied =
        check_voucher_transition(&staff_c, &v, None, VoucherStatus::InTransit, &ctx, &policy);
    assert!(!denied.allowed);
    assert!(denied.reason.is_some());

    // Staff of A applies the transition; the logger records old/new
    let old = v.status;
    v.status = VoucherStatus::InTransit;
    assert_eq!(old, VoucherStatus::Pending);

    // Admin force-sets Delivered
    let forced =
        check_voucher_transition(&admin, &v, None, VoucherStatus::Delivered, &ctx, &policy);
    assert!(forced.allowed);
    let old = v.status;
    v.status = VoucherStatus::Delivered;
    assert_eq!(old, VoucherStatus::InTransit);

    // Once delivered, the voucher becomes visible to any regional staff
    assert!(voucher_scope(&staff_c).allows(&v, None));
}

#[test]
fn visibility_follows_status() {
    let staff_a = actor(20, UserRole::Myanmar, Some(1));
    let staff_b = actor(21, UserRole::Malay, Some(2));

    let mut v = voucher("MAN0000002", VoucherStatus::Pending, 1, 2, 100);
    assert!(voucher_scope(&staff_a).allows(&v, None));
    assert!(!voucher_scope(&staff_b).allows(&v, None));

    v.status = VoucherStatus::InTransit;
    assert!(voucher_scope(&staff_a).allows(&v, None));
    assert!(voucher_scope(&staff_b).allows(&v, None));

    v.status = VoucherStatus::Delivered;
    assert!(voucher_scope(&staff_a).allows(&v, None));
    assert!(voucher_scope(&staff_b).allows(&v, None));
}

#[test]
fn unassigned_driver_cannot_touch_driver_eligible_voucher() {
    let policy = TransitionPolicy::permissive();
    let driver = actor(7, UserRole::Driver, None);
    let v = voucher("MAN0000003", VoucherStatus::InTransit, 1, 2, 100);

    // In Transit is driver-eligible, but this driver is not assigned
    let d = check_voucher_transition(
        &driver,
        &v,
        None,
        VoucherStatus::Received,
        &TransitionContext::primary_view(false),
        &policy,
    );
    assert!(!d.allowed);

    // Not visible to them either
    assert!(!voucher_scope(&driver).allows(&v, None));
}

#[test]
fn driver_delivery_with_pod_via_consignment() {
    let policy = TransitionPolicy::permissive();
    let driver = actor(7, UserRole::Driver, None);

    let consignment = Consignment {
        id: 42,
        code: format_consignment_code("CON", Utc::now().date_naive(), 1).unwrap(),
        name: "YGN-KUL weekly".to_string(),
        driver_id: Some(7),
        route: Some("Yangon - Myawaddy - Kuala Lumpur".to_string()),
        expected_delivery_date: None,
        status: ConsignmentStatus::OutForDelivery,
        notes: String::new(),
        created_by: 1,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };

    let mut v = voucher("MAN0000004", VoucherStatus::InTransit, 1, 2, 100);
    v.consignment_id = Some(consignment.id);

    // Visible to the assigned driver through the consignment
    assert!(voucher_scope(&driver).allows(&v, Some(&consignment)));

    // Delivered without POD is refused, with POD it goes through
    let without_pod = check_voucher_transition(
        &driver,
        &v,
        Some(&consignment),
        VoucherStatus::Delivered,
        &TransitionContext::primary_view(false),
        &policy,
    );
    assert!(!without_pod.allowed);

    let with_pod = check_voucher_transition(
        &driver,
        &v,
        Some(&consignment),
        VoucherStatus::Delivered,
        &TransitionContext::primary_view(true),
        &policy,
    );
    assert!(with_pod.allowed);

    // The driver may also complete the consignment itself
    let complete =
        check_consignment_transition(&driver, &consignment, ConsignmentStatus::Completed, &policy);
    assert!(complete.allowed);

    // But another driver's consignment is off limits
    let other = actor(8, UserRole::Driver, None);
    assert!(!consignment_scope(&other).allows(&consignment));
}

#[test]
fn sequential_codes_stay_ordered() {
    let codes: Vec<String> = (1..=50)
        .map(|seq| format_voucher_code("MAN", seq, 7).unwrap())
        .collect();

    let mut sorted = codes.clone();
    sorted.sort();
    assert_eq!(codes, sorted, "codes must sort in allocation order");

    let mut deduped = codes.clone();
    deduped.dedup();
    assert_eq!(deduped.len(), 50, "codes must be unique");
}

#[test]
fn notes_projection_mirrors_the_log() {
    let t0 = Utc.with_ymd_and_hms(2026, 8, 29, 9, 0, 0).unwrap();
    let t1 = Utc.with_ymd_and_hms(2026, 8, 29, 13, 45, 0).unwrap();

    let created = render_note_block(t0, "ayechan", None, "Pending", Some("fragile goods"));
    let moved = render_note_block(t1, "limwei", Some("Pending"), "In Transit", None);

    let notes = append_note(&append_note("", &created), &moved);
    assert_eq!(
        notes,
        "[2026-08-29 09:00 UTC] ayechan: created (Pending)\n  fragile goods\n\
         [2026-08-29 13:45 UTC] limwei: Pending -> In Transit"
    );
}

#[test]
fn strict_policy_is_an_opt_in_tightening() {
    let admin = actor(1, UserRole::Admin, None);
    let v = voucher("MAN0000005", VoucherStatus::Returned, 1, 2, 100);

    // Permissive (legacy-faithful): admin may revert a terminal state
    let permissive = check_voucher_transition(
        &admin,
        &v,
        None,
        VoucherStatus::Pending,
        &TransitionContext::primary_view(false),
        &TransitionPolicy::permissive(),
    );
    assert!(permissive.allowed);

    // Strict: terminal states stay terminal, even for admins
    let strict = check_voucher_transition(
        &admin,
        &v,
        None,
        VoucherStatus::Pending,
        &TransitionContext::primary_view(false),
        &TransitionPolicy::strict(),
    );
    assert!(!strict.allowed);
}

/// A batch attach must reject the whole request when any voucher id is
/// unknown, before any membership changes: three requested, one
/// missing, nothing attached.
#[test]
fn attach_batch_aborts_on_unknown_voucher() {
    let requested = vec![11, 12, 13];

    // Only two of the three exist
    let mut loaded = vec![voucher("MAN0000011", VoucherStatus::Pending, 1, 2, 100)];
    loaded[0].id = 11;
    let mut second = voucher("MAN0000013", VoucherStatus::Pending, 1, 2, 100);
    second.id = 13;
    loaded.push(second);

    let found: Vec<i64> = loaded.iter().map(|v| v.id).collect();
    let missing = missing_ids(&requested, &found);
    assert_eq!(missing, vec![12]);

    // The handler turns a non-empty missing set into a not-found error
    // and never reaches the update, so no voucher gains a consignment.
    assert!(!missing.is_empty());
    assert!(loaded.iter().all(|v| v.consignment_id.is_none()));

    // A fully known batch passes the same gate
    assert!(missing_ids(&[11, 13], &found).is_empty());
}

/// A voucher may only be assigned to an account with the driver role;
/// unknown ids and non-driver roles are rejected before the insert.
#[test]
fn voucher_driver_assignment_requires_driver_account() {
    let make_user = |id: i64, role: UserRole| User {
        id,
        username: format!("user{}", id),
        password_hash: String::new(),
        full_name: "Thiri Swe".to_string(),
        role,
        region_id: Some(1),
        currency: "MMK".to_string(),
        active: true,
        created_at: Utc::now(),
    };

    let driver = make_user(30, UserRole::Driver);
    assert!(ensure_driver(30, Some(&driver)).is_ok());

    let staff = make_user(20, UserRole::Myanmar);
    assert!(matches!(
        ensure_driver(20, Some(&staff)),
        Err(AppError::BadRequest(_))
    ));

    assert!(matches!(ensure_driver(99, None), Err(AppError::NotFound(_))));
}
