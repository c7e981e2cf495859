//! Status transition validation
//!
//! Encodes which actor may move a voucher or consignment into which
//! status. The legacy system imposed no transition graph at all: any
//! status could be written over any other as long as the actor had
//! role/region permission. That permissive behavior is the default
//! here; `TransitionPolicy::strict()` additionally enforces an
//! explicit graph and keeps terminal states terminal.
//!
//! Permission predicates are evaluated in a fixed precedence order,
//! first match wins:
//! 1. Admin
//! 2. Creator, on the primary voucher view (not on bulk update)
//! 3. Assigned driver (directly or via the voucher's consignment)
//! 4. Regional staff matched against origin/destination region
//! 5. Deny

use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::models::consignment::{Consignment, ConsignmentStatus};
use crate::models::user::{Actor, UserRole};
use crate::models::voucher::{Voucher, VoucherStatus};

/// Statuses a driver may set on a voucher
pub const DRIVER_ELIGIBLE: [VoucherStatus; 4] = [
    VoucherStatus::InTransit,
    VoucherStatus::Delivered,
    VoucherStatus::Received,
    VoucherStatus::Returned,
];

lazy_static! {
    /// Legal voucher transitions under the strict policy
    static ref STRICT_VOUCHER_GRAPH: HashMap<VoucherStatus, Vec<VoucherStatus>> = {
        use VoucherStatus::*;
        let mut g = HashMap::new();
        g.insert(Pending, vec![InTransit, Cancelled]);
        g.insert(InTransit, vec![Received, Delivered, Returned, Cancelled]);
        g.insert(Received, vec![Delivered, Returned]);
        // Delivered may only be re-confirmed, never left
        g.insert(Delivered, vec![Delivered]);
        g.insert(Cancelled, vec![]);
        g.insert(Returned, vec![]);
        g
    };

    /// Legal consignment transitions under the strict policy
    static ref STRICT_CONSIGNMENT_GRAPH: HashMap<ConsignmentStatus, Vec<ConsignmentStatus>> = {
        use ConsignmentStatus::*;
        let mut g = HashMap::new();
        g.insert(Pending, vec![Departed, Cancelled]);
        g.insert(Departed, vec![InTransit, Cancelled]);
        g.insert(InTransit, vec![ArrivedAtHub, Cancelled]);
        g.insert(ArrivedAtHub, vec![OutForDelivery, Cancelled]);
        g.insert(OutForDelivery, vec![Completed]);
        g.insert(Completed, vec![]);
        g.insert(Cancelled, vec![]);
        g
    };
}

/// Outcome of a transition check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub allowed: bool,
    pub reason: Option<&'static str>,
}

impl Decision {
    pub fn allow() -> Self {
        Self {
            allowed: true,
            reason: None,
        }
    }

    pub fn deny(reason: &'static str) -> Self {
        Self {
            allowed: false,
            reason: Some(reason),
        }
    }
}

/// How strictly transitions are checked
#[derive(Debug, Clone, Copy, Default)]
pub struct TransitionPolicy {
    pub strict_graph: bool,
}

impl TransitionPolicy {
    /// The legacy-faithful default: any status over any other,
    /// subject only to role/region permission.
    pub fn permissive() -> Self {
        Self {
            strict_graph: false,
        }
    }

    /// Opt-in enhancement: enforce the explicit transition graph
    pub fn strict() -> Self {
        Self { strict_graph: true }
    }
}

/// Call-site context the permission predicates depend on
#[derive(Debug, Clone, Copy)]
pub struct TransitionContext {
    /// True on the single-voucher view, false on bulk update.
    /// The creator rule only applies on the primary view.
    pub primary_view: bool,
    /// True when proof-of-delivery is being recorded in this action
    pub recording_pod: bool,
}

impl TransitionContext {
    pub fn primary_view(recording_pod: bool) -> Self {
        Self {
            primary_view: true,
            recording_pod,
        }
    }

    pub fn bulk_update() -> Self {
        Self {
            primary_view: false,
            recording_pod: false,
        }
    }
}

/// Whether `driver_id` is assigned to the voucher, directly or via
/// its consignment.
fn driver_assigned(driver_id: i64, voucher: &Voucher, consignment: Option<&Consignment>) -> bool {
    if voucher.driver_id == Some(driver_id) {
        return true;
    }
    match consignment {
        Some(c) => voucher.consignment_id == Some(c.id) && c.driver_id == Some(driver_id),
        None => false,
    }
}

/// Check whether `actor` may move `voucher` into `requested`.
///
/// `consignment` must be the voucher's consignment when it has one;
/// passing `None` for a voucher with a consignment simply means the
/// driver-via-consignment predicate cannot match.
pub fn check_voucher_transition(
    actor: &Actor,
    voucher: &Voucher,
    consignment: Option<&Consignment>,
    requested: VoucherStatus,
    ctx: &TransitionContext,
    policy: &TransitionPolicy,
) -> Decision {
    if policy.strict_graph {
        let legal = STRICT_VOUCHER_GRAPH
            .get(&voucher.status)
            .map(|targets| targets.contains(&requested))
            .unwrap_or(false);
        if !legal {
            return Decision::deny("transition is not legal under the strict status graph");
        }
    }

    // 1. Admin
    if actor.role == UserRole::Admin {
        return Decision::allow();
    }

    // 2. Creator, primary view only
    if ctx.primary_view && voucher.created_by == actor.id {
        return Decision::allow();
    }

    // 3. Assigned driver
    if actor.role == UserRole::Driver && driver_assigned(actor.id, voucher, consignment) {
        if !DRIVER_ELIGIBLE.contains(&requested) {
            return Decision::deny("drivers may only set in-transit, delivered, received or returned");
        }
        if requested == VoucherStatus::Delivered
            && !ctx.recording_pod
            && voucher.status != VoucherStatus::Delivered
        {
            return Decision::deny("delivered requires proof of delivery in the same action");
        }
        return Decision::allow();
    }

    // 4. Regional staff
    if actor.role.is_regional() {
        if let Some(region) = actor.region_id {
            let allowed = match voucher.status {
                VoucherStatus::Pending => region == voucher.origin_region_id,
                // Regional staff may always act on delivered vouchers.
                // Preserved from the legacy system; see DESIGN.md.
                VoucherStatus::Delivered => true,
                _ => {
                    region == voucher.origin_region_id || region == voucher.destination_region_id
                }
            };
            if allowed {
                return Decision::allow();
            }
            return Decision::deny("voucher is outside the actor's home region");
        }
    }

    // 5. Deny
    Decision::deny("role is not permitted to change voucher status")
}

/// Check whether `actor` may move `consignment` into `requested`.
/// Only admins and the assigned driver may mutate a consignment.
pub fn check_consignment_transition(
    actor: &Actor,
    consignment: &Consignment,
    requested: ConsignmentStatus,
    policy: &TransitionPolicy,
) -> Decision {
    if policy.strict_graph {
        let legal = STRICT_CONSIGNMENT_GRAPH
            .get(&consignment.status)
            .map(|targets| targets.contains(&requested))
            .unwrap_or(false);
        if !legal {
            return Decision::deny("transition is not legal under the strict status graph");
        }
    }

    if actor.role == UserRole::Admin {
        return Decision::allow();
    }

    if actor.role == UserRole::Driver && consignment.driver_id == Some(actor.id) {
        return Decision::allow();
    }

    Decision::deny("only admins and the assigned driver may change consignment status")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::Decimal;

    use crate::models::voucher::{DeliveryType, PaymentMethod};

    fn actor(id: i64, role: UserRole, region_id: Option<i64>) -> Actor {
        Actor {
            id,
            username: format!("user{}", id),
            role,
            region_id,
        }
    }

    fn voucher(status: VoucherStatus, origin: i64, dest: i64) -> Voucher {
        Voucher {
            id: 1,
            code: "MAN0000001".to_string(),
            sender_name: "Aye Chan".to_string(),
            sender_phone: "09111".to_string(),
            sender_address: "Yangon".to_string(),
            receiver_name: "Lim Wei".to_string(),
            receiver_phone: "01222".to_string(),
            receiver_address: "Kuala Lumpur".to_string(),
            weight_kg: Decimal::new(25, 1),
            currency: "MMK".to_string(),
            total_amount: Decimal::new(50000, 0),
            payment_method: PaymentMethod::Cash,
            delivery_type: DeliveryType::HomeDelivery,
            status,
            notes: String::new(),
            origin_region_id: origin,
            destination_region_id: dest,
            consignment_id: None,
            driver_id: None,
            pod_image_path: None,
            created_by: 100,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn consignment(id: i64, driver_id: Option<i64>) -> Consignment {
        Consignment {
            id,
            code: "CON-20260829-001".to_string(),
            name: "YGN-KUL weekly".to_string(),
            driver_id,
            route: None,
            expected_delivery_date: None,
            status: ConsignmentStatus::Pending,
            notes: String::new(),
            created_by: 1,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    const PERMISSIVE: TransitionPolicy = TransitionPolicy { strict_graph: false };
    const STRICT: TransitionPolicy = TransitionPolicy { strict_graph: true };

    #[test]
    fn test_admin_is_always_allowed() {
        let admin = actor(1, UserRole::Admin, None);
        let v = voucher(VoucherStatus::Delivered, 1, 2);
        // Even a terminal regression is allowed under the permissive policy
        let d = check_voucher_transition(
            &admin,
            &v,
            None,
            VoucherStatus::Pending,
            &TransitionContext::primary_view(false),
            &PERMISSIVE,
        );
        assert!(d.allowed);
    }

    #[test]
    fn test_strict_policy_blocks_terminal_regression() {
        let admin = actor(1, UserRole::Admin, None);
        let v = voucher(VoucherStatus::Delivered, 1, 2);
        let d = check_voucher_transition(
            &admin,
            &v,
            None,
            VoucherStatus::Pending,
            &TransitionContext::primary_view(false),
            &STRICT,
        );
        assert!(!d.allowed);

        // Re-confirming delivered stays legal
        let d = check_voucher_transition(
            &admin,
            &v,
            None,
            VoucherStatus::Delivered,
            &TransitionContext::primary_view(false),
            &STRICT,
        );
        assert!(d.allowed);
    }

    #[test]
    fn test_creator_allowed_on_primary_view_only() {
        let creator = actor(100, UserRole::Staff, None);
        let v = voucher(VoucherStatus::Pending, 1, 2);

        let d = check_voucher_transition(
            &creator,
            &v,
            None,
            VoucherStatus::Cancelled,
            &TransitionContext::primary_view(false),
            &PERMISSIVE,
        );
        assert!(d.allowed);

        let d = check_voucher_transition(
            &creator,
            &v,
            None,
            VoucherStatus::Cancelled,
            &TransitionContext::bulk_update(),
            &PERMISSIVE,
        );
        assert!(!d.allowed);
    }

    #[test]
    fn test_unassigned_driver_is_denied() {
        let driver = actor(7, UserRole::Driver, None);
        let v = voucher(VoucherStatus::InTransit, 1, 2);
        let d = check_voucher_transition(
            &driver,
            &v,
            None,
            VoucherStatus::Received,
            &TransitionContext::primary_view(false),
            &PERMISSIVE,
        );
        assert!(!d.allowed);
    }

    #[test]
    fn test_driver_assigned_via_consignment() {
        let driver = actor(7, UserRole::Driver, None);
        let mut v = voucher(VoucherStatus::InTransit, 1, 2);
        v.consignment_id = Some(42);
        let c = consignment(42, Some(7));

        let d = check_voucher_transition(
            &driver,
            &v,
            Some(&c),
            VoucherStatus::Received,
            &TransitionContext::primary_view(false),
            &PERMISSIVE,
        );
        assert!(d.allowed);

        // A different consignment's driver gets nothing
        let other = consignment(43, Some(9));
        let d = check_voucher_transition(
            &driver,
            &v,
            Some(&other),
            VoucherStatus::Received,
            &TransitionContext::primary_view(false),
            &PERMISSIVE,
        );
        assert!(!d.allowed);
    }

    #[test]
    fn test_driver_cannot_set_non_eligible_status() {
        let driver = actor(7, UserRole::Driver, None);
        let mut v = voucher(VoucherStatus::InTransit, 1, 2);
        v.driver_id = Some(7);
        let d = check_voucher_transition(
            &driver,
            &v,
            None,
            VoucherStatus::Cancelled,
            &TransitionContext::primary_view(false),
            &PERMISSIVE,
        );
        assert!(!d.allowed);
    }

    #[test]
    fn test_driver_delivered_requires_pod() {
        let driver = actor(7, UserRole::Driver, None);
        let mut v = voucher(VoucherStatus::InTransit, 1, 2);
        v.driver_id = Some(7);

        let d = check_voucher_transition(
            &driver,
            &v,
            None,
            VoucherStatus::Delivered,
            &TransitionContext::primary_view(false),
            &PERMISSIVE,
        );
        assert!(!d.allowed);

        let d = check_voucher_transition(
            &driver,
            &v,
            None,
            VoucherStatus::Delivered,
            &TransitionContext::primary_view(true),
            &PERMISSIVE,
        );
        assert!(d.allowed);

        // Re-confirming an already delivered voucher needs no new POD
        v.status = VoucherStatus::Delivered;
        let d = check_voucher_transition(
            &driver,
            &v,
            None,
            VoucherStatus::Delivered,
            &TransitionContext::primary_view(false),
            &PERMISSIVE,
        );
        assert!(d.allowed);
    }

    #[test]
    fn test_regional_staff_pending_origin_only() {
        let v = voucher(VoucherStatus::Pending, 1, 2);
        let origin_staff = actor(20, UserRole::Myanmar, Some(1));
        let dest_staff = actor(21, UserRole::Malay, Some(2));

        let ctx = TransitionContext::bulk_update();
        assert!(
            check_voucher_transition(&origin_staff, &v, None, VoucherStatus::InTransit, &ctx, &PERMISSIVE)
                .allowed
        );
        assert!(
            !check_voucher_transition(&dest_staff, &v, None, VoucherStatus::InTransit, &ctx, &PERMISSIVE)
                .allowed
        );
    }

    #[test]
    fn test_regional_staff_in_transit_origin_or_destination() {
        let v = voucher(VoucherStatus::InTransit, 1, 2);
        let ctx = TransitionContext::bulk_update();
        let origin_staff = actor(20, UserRole::Myanmar, Some(1));
        let dest_staff = actor(21, UserRole::Malay, Some(2));
        let unrelated = actor(22, UserRole::Malay, Some(3));

        assert!(
            check_voucher_transition(&origin_staff, &v, None, VoucherStatus::Received, &ctx, &PERMISSIVE)
                .allowed
        );
        assert!(
            check_voucher_transition(&dest_staff, &v, None, VoucherStatus::Received, &ctx, &PERMISSIVE)
                .allowed
        );
        assert!(
            !check_voucher_transition(&unrelated, &v, None, VoucherStatus::Received, &ctx, &PERMISSIVE)
                .allowed
        );
    }

    #[test]
    fn test_regional_staff_delivered_quirk() {
        // Any regional staff may act on delivered vouchers
        let v = voucher(VoucherStatus::Delivered, 1, 2);
        let unrelated = actor(22, UserRole::Malay, Some(3));
        let d = check_voucher_transition(
            &unrelated,
            &v,
            None,
            VoucherStatus::Delivered,
            &TransitionContext::bulk_update(),
            &PERMISSIVE,
        );
        assert!(d.allowed);
    }

    #[test]
    fn test_staff_without_relation_denied_with_reason() {
        let v = voucher(VoucherStatus::InTransit, 1, 2);
        let stranger = actor(30, UserRole::Staff, None);
        let d = check_voucher_transition(
            &stranger,
            &v,
            None,
            VoucherStatus::Delivered,
            &TransitionContext::bulk_update(),
            &PERMISSIVE,
        );
        assert!(!d.allowed);
        assert!(d.reason.is_some());
    }

    #[test]
    fn test_consignment_admin_and_assigned_driver_only() {
        let c = consignment(1, Some(7));
        let admin = actor(1, UserRole::Admin, None);
        let driver = actor(7, UserRole::Driver, None);
        let other_driver = actor(8, UserRole::Driver, None);
        let regional = actor(20, UserRole::Myanmar, Some(1));

        assert!(
            check_consignment_transition(&admin, &c, ConsignmentStatus::Departed, &PERMISSIVE).allowed
        );
        assert!(
            check_consignment_transition(&driver, &c, ConsignmentStatus::Departed, &PERMISSIVE).allowed
        );
        assert!(
            !check_consignment_transition(&other_driver, &c, ConsignmentStatus::Departed, &PERMISSIVE)
                .allowed
        );
        assert!(
            !check_consignment_transition(&regional, &c, ConsignmentStatus::Departed, &PERMISSIVE)
                .allowed
        );
    }

    #[test]
    fn test_strict_consignment_graph() {
        let mut c = consignment(1, None);
        let admin = actor(1, UserRole::Admin, None);

        assert!(
            check_consignment_transition(&admin, &c, ConsignmentStatus::Departed, &STRICT).allowed
        );
        assert!(
            !check_consignment_transition(&admin, &c, ConsignmentStatus::Completed, &STRICT).allowed
        );

        c.status = ConsignmentStatus::Completed;
        assert!(
            !check_consignment_transition(&admin, &c, ConsignmentStatus::Pending, &STRICT).allowed
        );
    }
}
