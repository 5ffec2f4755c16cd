//! The session state record and its transitions.
//!
//! [`SessionState`] is the only mutable state of an ordering session. It is owned
//! by a [`SessionActor`](crate::framework::SessionActor); everything else sees
//! snapshots.

use chrono::NaiveDate;

use crate::catalog::Catalog;
use crate::configurator::ItemSelection;
use crate::framework::SessionEntity;
use crate::model::{Cart, CartEvent, OrderRequest, PickupDetails, ShopStatus};

use super::actions::{SessionAction, SessionOutcome};
use super::admin::AdminGate;
use super::error::{AuthError, OrderError, OrderField, ValidationError};

#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    catalog: Catalog,
    status: ShopStatus,
    cart: Cart,
    draft: Option<ItemSelection>,
    checkout_open: bool,
    pickup: PickupDetails,
    submitting: bool,
    admin: AdminGate,
    status_change_granted: bool,
}

impl SessionState {
    /// Fresh session with an empty cart and pickup defaulting to `today`.
    pub fn new(catalog: Catalog, status: ShopStatus, today: NaiveDate) -> Self {
        Self {
            catalog,
            status,
            cart: Cart::new(),
            draft: None,
            checkout_open: false,
            pickup: PickupDetails::for_date(today),
            submitting: false,
            admin: AdminGate::Closed,
            status_change_granted: false,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn status(&self) -> &ShopStatus {
        &self.status
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn draft(&self) -> Option<&ItemSelection> {
        self.draft.as_ref()
    }

    pub fn is_checkout_open(&self) -> bool {
        self.checkout_open
    }

    pub fn pickup(&self) -> &PickupDetails {
        &self.pickup
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn admin(&self) -> AdminGate {
        self.admin
    }

    fn draft_mut(&mut self) -> Result<&mut ItemSelection, ValidationError> {
        self.draft.as_mut().ok_or(ValidationError::NoDraft)
    }

    fn edit_draft(
        &mut self,
        edit: impl FnOnce(&mut ItemSelection) -> Result<(), ValidationError>,
    ) -> Result<SessionOutcome, OrderError> {
        let draft = self.draft_mut()?;
        edit(draft)?;
        Ok(SessionOutcome::Draft(draft.clone()))
    }

    fn ensure_idle(&self) -> Result<(), OrderError> {
        if self.submitting {
            return Err(OrderError::SubmissionInProgress);
        }
        Ok(())
    }

    /// Submission preconditions, checked in the order the customer would fix them.
    fn validate_order(&self) -> Result<(), ValidationError> {
        if self.cart.is_empty() {
            return Err(ValidationError::EmptyCart);
        }
        if !self.status.is_open {
            return Err(ValidationError::ShopClosed);
        }
        if self.pickup.date.trim().is_empty() {
            return Err(ValidationError::IncompleteOrder(OrderField::PickupDate));
        }
        if self.pickup.time.trim().is_empty() {
            return Err(ValidationError::IncompleteOrder(OrderField::PickupTime));
        }
        Ok(())
    }
}

impl SessionEntity for SessionState {
    type Action = SessionAction;
    type Outcome = SessionOutcome;
    type Error = OrderError;

    fn apply(&mut self, action: SessionAction) -> Result<SessionOutcome, OrderError> {
        match action {
            SessionAction::OpenItem(id) => {
                let item = self
                    .catalog
                    .find(&id)
                    .cloned()
                    .ok_or(ValidationError::UnknownItem(id))?;
                let draft = ItemSelection::open(item);
                self.draft = Some(draft.clone());
                Ok(SessionOutcome::Draft(draft))
            }
            SessionAction::SetMain(main) => self.edit_draft(|d| d.set_main(main)),
            SessionAction::SetSoup(soup) => self.edit_draft(|d| d.set_soup(soup)),
            SessionAction::SetSpice(spice) => self.edit_draft(|d| d.set_spice(spice)),
            SessionAction::ToggleAddon(label) => {
                let draft = self.draft_mut()?;
                let selected = draft.toggle_addon(&label)?;
                Ok(SessionOutcome::AddonToggled {
                    selected,
                    draft: draft.clone(),
                })
            }
            SessionAction::SetQuantity(n) => self.edit_draft(|d| d.set_quantity(n)),
            SessionAction::IncrementQuantity => self.edit_draft(|d| {
                d.increment();
                Ok(())
            }),
            SessionAction::DecrementQuantity => self.edit_draft(|d| {
                d.decrement();
                Ok(())
            }),
            SessionAction::SetItemNote(note) => self.edit_draft(|d| {
                d.set_note(note);
                Ok(())
            }),
            SessionAction::CommitItem => {
                self.ensure_idle()?;
                let draft = self.draft.as_ref().ok_or(ValidationError::NoDraft)?;
                let line = draft.commit()?;
                if self.cart.total_with(&line).is_none() {
                    return Err(ValidationError::AmountTooLarge.into());
                }
                self.cart.add(line.clone());
                self.draft = None;
                Ok(SessionOutcome::Committed {
                    line,
                    total: self.cart.total(),
                })
            }
            SessionAction::CancelItem => {
                self.draft = None;
                Ok(SessionOutcome::Cancelled)
            }

            SessionAction::RemoveLine(index) => {
                self.ensure_idle()?;
                let outcome = self.cart.remove(index);
                if outcome.event == Some(CartEvent::BecameEmpty) {
                    self.checkout_open = false;
                }
                Ok(SessionOutcome::Removed {
                    removed: outcome.removed,
                    event: outcome.event,
                    total: self.cart.total(),
                })
            }
            SessionAction::OpenCheckout => {
                if self.cart.is_empty() {
                    return Err(ValidationError::EmptyCart.into());
                }
                self.checkout_open = true;
                Ok(SessionOutcome::Checkout { open: true })
            }
            SessionAction::CloseCheckout => {
                self.checkout_open = false;
                Ok(SessionOutcome::Checkout { open: false })
            }
            SessionAction::SetPickup(pickup) => {
                self.pickup = pickup;
                Ok(SessionOutcome::Pickup(self.pickup.clone()))
            }

            SessionAction::BeginSubmission { now } => {
                self.ensure_idle()?;
                self.validate_order()?;
                self.submitting = true;
                Ok(SessionOutcome::SubmissionStarted(OrderRequest {
                    vendor_name: self.status.name.clone(),
                    cart: self.cart.clone(),
                    pickup: self.pickup.clone(),
                    created_at: now,
                }))
            }
            SessionAction::FinishSubmission { clear_cart } => {
                if !self.submitting {
                    return Err(OrderError::NoSubmissionInFlight);
                }
                self.submitting = false;
                if clear_cart {
                    self.cart.clear();
                    self.checkout_open = false;
                }
                Ok(SessionOutcome::SubmissionFinished {
                    cart_cleared: clear_cart,
                })
            }

            SessionAction::OpenAdmin => {
                self.admin.open();
                Ok(SessionOutcome::Admin(self.admin))
            }
            SessionAction::SubmitPassword(password) => {
                self.admin
                    .submit_password(&self.status.admin_secret, &password.0)?;
                Ok(SessionOutcome::Admin(self.admin))
            }
            SessionAction::CloseAdmin => {
                self.admin.close();
                Ok(SessionOutcome::Admin(self.admin))
            }
            SessionAction::AuthorizeStatusChange => {
                self.admin.require_action_menu()?;
                self.status_change_granted = true;
                Ok(SessionOutcome::StatusChangeAuthorized {
                    vendor_name: self.status.name.clone(),
                })
            }
            SessionAction::ApplyOpenStatus(is_open) => {
                if !std::mem::take(&mut self.status_change_granted) {
                    return Err(AuthError::NotAuthorized.into());
                }
                self.status.is_open = is_open;
                self.admin.close();
                Ok(SessionOutcome::StatusApplied { is_open })
            }
            SessionAction::AbandonStatusChange => {
                self.status_change_granted = false;
                Ok(SessionOutcome::Admin(self.admin))
            }

            SessionAction::ReplaceCatalog { catalog, status } => {
                self.catalog = catalog;
                self.status = status;
                Ok(SessionOutcome::CatalogReplaced {
                    items: self.catalog.len(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::configurator::{SpiceLevel, EXTRA_RICE};
    use crate::model::{MenuItem, StapleKind};
    use crate::session_actor::{Password, SelectionField};
    use chrono::TimeZone;
    use chrono_tz::Asia::Taipei;

    fn state() -> SessionState {
        let catalog = Catalog::from_items(vec![
            MenuItem::combo(
                "c1",
                "Set A",
                110,
                vec!["Rice".into(), "Noodle".into()],
                vec!["Soup".into(), "Tea".into()],
            ),
            MenuItem::single("s1", "Iced tea", 30, StapleKind::None),
            MenuItem::single("s2", "Braised pork rice", 60, StapleKind::Rice),
        ]);
        let status = ShopStatus {
            name: "Auntie Lin".into(),
            is_open: true,
            notices: vec![],
            admin_secret: "1234".into(),
        };
        SessionState::new(catalog, status, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap())
    }

    fn add(state: &mut SessionState, id: &str) {
        state.apply(SessionAction::OpenItem(id.into())).unwrap();
        state.apply(SessionAction::CommitItem).unwrap();
    }

    fn begin(state: &mut SessionState) -> Result<SessionOutcome, OrderError> {
        let now = Taipei.with_ymd_and_hms(2024, 6, 1, 11, 0, 0).unwrap();
        state.apply(SessionAction::BeginSubmission { now })
    }

    #[test]
    fn test_new_session_defaults_pickup_date() {
        let state = state();
        assert_eq!(state.pickup().date, "2024-06-01");
        assert_eq!(state.pickup().time, "");
        assert!(state.cart().is_empty());
        assert_eq!(state.admin(), AdminGate::Closed);
    }

    #[test]
    fn test_combo_commit_without_soup_leaves_cart_untouched() {
        let mut state = state();
        state.apply(SessionAction::OpenItem("c1".into())).unwrap();
        state.apply(SessionAction::SetMain("Rice".into())).unwrap();

        let before = state.clone();
        let err = state.apply(SessionAction::CommitItem).unwrap_err();
        assert_eq!(
            err,
            OrderError::Validation(ValidationError::MissingSelection(SelectionField::Soup))
        );
        assert_eq!(state, before);
        assert!(state.draft().is_some());
    }

    #[test]
    fn test_full_combo_flow() {
        let mut state = state();
        state.apply(SessionAction::OpenItem("c1".into())).unwrap();
        state.apply(SessionAction::SetMain("Rice".into())).unwrap();
        state.apply(SessionAction::SetSoup("Soup".into())).unwrap();
        state.apply(SessionAction::SetSpice(SpiceLevel::Hot)).unwrap();
        let toggled = state
            .apply(SessionAction::ToggleAddon(EXTRA_RICE.into()))
            .unwrap();
        assert!(matches!(toggled, SessionOutcome::AddonToggled { selected: true, .. }));
        state.apply(SessionAction::IncrementQuantity).unwrap();

        let outcome = state.apply(SessionAction::CommitItem).unwrap();
        let SessionOutcome::Committed { line, total } = outcome else {
            panic!("expected Committed, got {outcome:?}");
        };
        assert_eq!(line.display_price(), 240);
        assert_eq!(total, 240);
        assert_eq!(line.customs_summary(), "main:Rice / soup:Soup / hot / extra rice");
        assert!(state.draft().is_none());
    }

    #[test]
    fn test_edits_without_draft_are_rejected() {
        let mut state = state();
        assert_eq!(
            state.apply(SessionAction::SetQuantity(2)).unwrap_err(),
            OrderError::Validation(ValidationError::NoDraft)
        );
        assert_eq!(
            state.apply(SessionAction::OpenItem("zzz".into())).unwrap_err(),
            OrderError::Validation(ValidationError::UnknownItem("zzz".into()))
        );
    }

    #[test]
    fn test_removing_last_line_closes_checkout_once() {
        let mut state = state();
        add(&mut state, "s1");
        add(&mut state, "s2");
        state.apply(SessionAction::OpenCheckout).unwrap();

        let mut events = 0;
        for index in [1, 0, 0] {
            if let SessionOutcome::Removed { event: Some(_), .. } =
                state.apply(SessionAction::RemoveLine(index)).unwrap()
            {
                events += 1;
            }
        }
        assert_eq!(events, 1);
        assert!(!state.is_checkout_open());
    }

    #[test]
    fn test_checkout_requires_items() {
        let mut state = state();
        assert_eq!(
            state.apply(SessionAction::OpenCheckout).unwrap_err(),
            OrderError::Validation(ValidationError::EmptyCart)
        );
    }

    #[test]
    fn test_submission_validation_order() {
        let mut state = state();
        assert_eq!(
            begin(&mut state).unwrap_err(),
            OrderError::Validation(ValidationError::EmptyCart)
        );

        add(&mut state, "s1");
        assert_eq!(
            begin(&mut state).unwrap_err(),
            OrderError::Validation(ValidationError::IncompleteOrder(OrderField::PickupTime))
        );

        state
            .apply(SessionAction::SetPickup(PickupDetails::new("", "12:30")))
            .unwrap();
        assert_eq!(
            begin(&mut state).unwrap_err(),
            OrderError::Validation(ValidationError::IncompleteOrder(OrderField::PickupDate))
        );
        assert!(!state.is_submitting());
    }

    #[test]
    fn test_closed_shop_blocks_submission() {
        let mut state = state();
        add(&mut state, "s1");
        state
            .apply(SessionAction::SetPickup(PickupDetails::new("2024-06-01", "12:30")))
            .unwrap();
        state.status.is_open = false;
        assert_eq!(
            begin(&mut state).unwrap_err(),
            OrderError::Validation(ValidationError::ShopClosed)
        );
    }

    #[test]
    fn test_in_flight_flag_guards_reentry_and_cart() {
        let mut state = state();
        add(&mut state, "s1");
        state
            .apply(SessionAction::SetPickup(
                PickupDetails::new("2024-06-01", "12:30").with_note("no straw"),
            ))
            .unwrap();

        let SessionOutcome::SubmissionStarted(request) = begin(&mut state).unwrap() else {
            panic!("expected SubmissionStarted");
        };
        assert_eq!(request.vendor_name, "Auntie Lin");
        assert_eq!(request.total(), 30);
        assert_eq!(request.note(), Some("no straw"));
        assert!(state.is_submitting());

        assert_eq!(begin(&mut state).unwrap_err(), OrderError::SubmissionInProgress);
        assert_eq!(
            state.apply(SessionAction::RemoveLine(0)).unwrap_err(),
            OrderError::SubmissionInProgress
        );
        state.apply(SessionAction::OpenItem("s2".into())).unwrap();
        assert_eq!(
            state.apply(SessionAction::CommitItem).unwrap_err(),
            OrderError::SubmissionInProgress
        );

        state
            .apply(SessionAction::FinishSubmission { clear_cart: false })
            .unwrap();
        assert!(!state.is_submitting());
        assert_eq!(state.cart().len(), 1);
        assert_eq!(
            state
                .apply(SessionAction::FinishSubmission { clear_cart: true })
                .unwrap_err(),
            OrderError::NoSubmissionInFlight
        );
    }

    #[test]
    fn test_cleared_submission_empties_cart_and_closes_checkout() {
        let mut state = state();
        add(&mut state, "s1");
        state.apply(SessionAction::OpenCheckout).unwrap();
        state
            .apply(SessionAction::SetPickup(PickupDetails::new("2024-06-01", "12:30")))
            .unwrap();
        begin(&mut state).unwrap();
        state
            .apply(SessionAction::FinishSubmission { clear_cart: true })
            .unwrap();
        assert!(state.cart().is_empty());
        assert!(!state.is_checkout_open());
    }

    #[test]
    fn test_admin_status_change_requires_password() {
        let mut state = state();
        assert_eq!(
            state.apply(SessionAction::AuthorizeStatusChange).unwrap_err(),
            OrderError::Auth(AuthError::NotAuthorized)
        );

        state.apply(SessionAction::OpenAdmin).unwrap();
        assert_eq!(
            state
                .apply(SessionAction::SubmitPassword(Password("nope".into())))
                .unwrap_err(),
            OrderError::Auth(AuthError::WrongPassword)
        );
        assert_eq!(state.admin(), AdminGate::CredentialEntry);

        state
            .apply(SessionAction::SubmitPassword(Password("1234".into())))
            .unwrap();
        let outcome = state.apply(SessionAction::AuthorizeStatusChange).unwrap();
        assert_eq!(
            outcome,
            SessionOutcome::StatusChangeAuthorized {
                vendor_name: "Auntie Lin".into()
            }
        );

        state.apply(SessionAction::ApplyOpenStatus(false)).unwrap();
        assert!(!state.status().is_open);
        assert_eq!(state.admin(), AdminGate::Closed);
    }

    #[test]
    fn test_authorized_status_change_survives_gate_close() {
        let mut state = state();
        state.apply(SessionAction::OpenAdmin).unwrap();
        state
            .apply(SessionAction::SubmitPassword(Password("1234".into())))
            .unwrap();
        state.apply(SessionAction::AuthorizeStatusChange).unwrap();

        // Patch in flight; the admin closes the panel
        state.apply(SessionAction::CloseAdmin).unwrap();
        state.apply(SessionAction::ApplyOpenStatus(false)).unwrap();
        assert!(!state.status().is_open);
        assert_eq!(state.admin(), AdminGate::Closed);

        // One grant, one apply
        assert_eq!(
            state.apply(SessionAction::ApplyOpenStatus(true)).unwrap_err(),
            OrderError::Auth(AuthError::NotAuthorized)
        );
        assert!(!state.status().is_open);
    }

    #[test]
    fn test_abandoned_status_change_cannot_be_applied() {
        let mut state = state();
        assert_eq!(
            state.apply(SessionAction::ApplyOpenStatus(false)).unwrap_err(),
            OrderError::Auth(AuthError::NotAuthorized)
        );

        state.apply(SessionAction::OpenAdmin).unwrap();
        state
            .apply(SessionAction::SubmitPassword(Password("1234".into())))
            .unwrap();
        state.apply(SessionAction::AuthorizeStatusChange).unwrap();
        assert_eq!(
            state.apply(SessionAction::AbandonStatusChange).unwrap(),
            SessionOutcome::Admin(AdminGate::ActionMenu)
        );
        assert_eq!(
            state.apply(SessionAction::ApplyOpenStatus(false)).unwrap_err(),
            OrderError::Auth(AuthError::NotAuthorized)
        );
        assert!(state.status().is_open);
    }

    #[test]
    fn test_oversized_line_is_rejected_without_touching_cart() {
        let mut state = state();
        state.apply(SessionAction::OpenItem("s2".into())).unwrap();
        assert_eq!(
            state.apply(SessionAction::SetQuantity(50_000_000)).unwrap_err(),
            OrderError::Validation(ValidationError::InvalidQuantity(50_000_000))
        );

        let status = state.status().clone();
        state
            .apply(SessionAction::ReplaceCatalog {
                catalog: Catalog::from_items(vec![MenuItem::single(
                    "big",
                    "Banquet",
                    u32::MAX / 2 + 1,
                    StapleKind::None,
                )]),
                status,
            })
            .unwrap();
        add(&mut state, "big");
        state.apply(SessionAction::OpenItem("big".into())).unwrap();
        assert_eq!(
            state.apply(SessionAction::CommitItem).unwrap_err(),
            OrderError::Validation(ValidationError::AmountTooLarge)
        );
        assert_eq!(state.cart().len(), 1);
        assert!(state.draft().is_some());
    }

    #[test]
    fn test_password_is_redacted_in_debug() {
        let action = SessionAction::SubmitPassword(Password("1234".into()));
        assert!(!format!("{action:?}").contains("1234"));
    }

    #[test]
    fn test_replace_catalog() {
        let mut state = state();
        let outcome = state
            .apply(SessionAction::ReplaceCatalog {
                catalog: Catalog::default(),
                status: ShopStatus::default(),
            })
            .unwrap();
        assert_eq!(outcome, SessionOutcome::CatalogReplaced { items: 0 });
        assert_eq!(state.status().name, "Ordering");
    }
}
