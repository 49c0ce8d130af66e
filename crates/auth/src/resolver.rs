//! Effective-permission resolution over a role set.

use std::borrow::Borrow;
use std::collections::BTreeSet;
use std::sync::Arc;

use crate::{Permission, Role, RolePermissionMap};

/// Answers "may a holder of these roles do X" from a static role table.
///
/// Pure and side-effect free: no IO, no panics, no locking. Cloning is cheap
/// (the table is shared), so one resolver can be handed to every request.
///
/// Permissions are additive across roles: a principal holding several roles
/// gets the union of what each role grants.
#[derive(Debug, Clone)]
pub struct AuthorizationResolver {
    table: Arc<RolePermissionMap>,
}

impl AuthorizationResolver {
    pub fn new(table: RolePermissionMap) -> Self {
        Self {
            table: Arc::new(table),
        }
    }

    /// Resolver over [`RolePermissionMap::standard`].
    pub fn standard() -> Self {
        Self::new(RolePermissionMap::standard())
    }

    pub fn table(&self) -> &RolePermissionMap {
        &self.table
    }

    /// Configured permissions for `role`; empty if the role has no entry.
    pub fn permissions_for_role(&self, role: Role) -> BTreeSet<Permission> {
        self.table.get(role).cloned().unwrap_or_default()
    }

    /// Union of [`permissions_for_role`](Self::permissions_for_role) over `roles`.
    pub fn permissions_for_roles<I>(&self, roles: I) -> BTreeSet<Permission>
    where
        I: IntoIterator,
        I::Item: Borrow<Role>,
    {
        let mut effective = BTreeSet::new();
        for role in roles {
            if let Some(granted) = self.table.get(*role.borrow()) {
                effective.extend(granted.iter().copied());
            }
        }
        effective
    }

    pub fn role_has_permission(&self, role: Role, permission: Permission) -> bool {
        self.table
            .get(role)
            .is_some_and(|granted| granted.contains(&permission))
    }

    /// The authorization gate: true if any held role grants `permission`.
    ///
    /// Equivalent to `permissions_for_roles(roles).contains(&permission)`
    /// without materialising the union.
    pub fn roles_have_permission<I>(&self, roles: I, permission: Permission) -> bool
    where
        I: IntoIterator,
        I::Item: Borrow<Role>,
    {
        roles
            .into_iter()
            .any(|role| self.role_has_permission(*role.borrow(), permission))
    }

    /// True if the held roles grant at least one of `permissions`.
    pub fn roles_have_any_permission<I>(&self, roles: I, permissions: &[Permission]) -> bool
    where
        I: IntoIterator,
        I::Item: Borrow<Role>,
    {
        let effective = self.permissions_for_roles(roles);
        permissions.iter().any(|p| effective.contains(p))
    }

    /// Every role whose configured set contains `permission` (audit/reporting).
    pub fn roles_with_permission(&self, permission: Permission) -> BTreeSet<Role> {
        self.table
            .iter()
            .filter(|(_, granted)| granted.contains(&permission))
            .map(|(role, _)| role)
            .collect()
    }

    /// Authority strings for a role set: `ROLE_<NAME>` per role followed by
    /// every effective permission name, sorted and de-duplicated.
    pub fn authorities<I>(&self, roles: I) -> Vec<String>
    where
        I: IntoIterator,
        I::Item: Borrow<Role>,
    {
        let roles: BTreeSet<Role> = roles.into_iter().map(|r| *r.borrow()).collect();
        let mut out: Vec<String> = roles.iter().map(Role::authority).collect();
        out.extend(
            self.permissions_for_roles(&roles)
                .iter()
                .map(|p| p.as_str().to_string()),
        );
        out.sort();
        out
    }
}

impl Default for AuthorizationResolver {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn resolver() -> AuthorizationResolver {
        AuthorizationResolver::standard()
    }

    fn any_role() -> impl Strategy<Value = Role> {
        prop::sample::select(Role::ALL.to_vec())
    }

    fn any_permission() -> impl Strategy<Value = Permission> {
        prop::sample::select(Permission::ALL.to_vec())
    }

    #[test]
    fn unconfigured_role_resolves_to_empty_set() {
        let resolver = AuthorizationResolver::new(
            RolePermissionMap::builder()
                .grant(Role::Admin, [Permission::ViewReports])
                .build(),
        );

        for role in Role::ALL.iter().copied().filter(|r| *r != Role::Admin) {
            assert!(resolver.permissions_for_role(role).is_empty());
            assert!(!resolver.role_has_permission(role, Permission::ViewReports));
        }
        assert!(AuthorizationResolver::new(RolePermissionMap::empty())
            .permissions_for_role(Role::SystemAdmin)
            .is_empty());
    }

    #[test]
    fn empty_role_set_has_no_permissions() {
        let resolver = resolver();
        let none: [Role; 0] = [];
        assert!(resolver.permissions_for_roles(none).is_empty());
        assert!(!resolver.roles_have_permission(none, Permission::ViewReports));
        assert!(resolver.authorities(none).is_empty());
    }

    #[test]
    fn system_admin_has_every_permission() {
        let resolver = resolver();
        for p in Permission::ALL {
            assert!(
                resolver.roles_have_permission([Role::SystemAdmin], *p),
                "SYSTEM_ADMIN lacks {p}"
            );
        }
    }

    #[test]
    fn estimator_alone_cannot_approve_quotes() {
        assert!(!resolver().roles_have_permission([Role::Estimator], Permission::ApproveQuote));
    }

    #[test]
    fn estimator_and_manager_together_can_approve_quotes() {
        let resolver = resolver();
        let roles = BTreeSet::from([Role::Estimator, Role::Manager]);
        assert!(resolver.roles_have_permission(&roles, Permission::ApproveQuote));
        assert!(resolver.permissions_for_roles(&roles).contains(&Permission::ApproveQuote));
        // Estimator-only grants survive the union as well.
        assert!(resolver.roles_have_permission(&roles, Permission::EditOwnQuotes));
    }

    #[test]
    fn any_permission_check_matches_either_scope() {
        let resolver = resolver();
        let scopes = [Permission::ViewAllQuotes, Permission::ViewOwnQuotes];
        assert!(resolver.roles_have_any_permission([Role::Estimator], &scopes));
        assert!(resolver.roles_have_any_permission([Role::Finance], &scopes));
        assert!(!resolver.roles_have_any_permission([Role::HumanResources], &scopes));
        assert!(!resolver.roles_have_any_permission([Role::Manager], &[]));
    }

    #[test]
    fn inverse_lookup_lists_granting_roles() {
        let approvers = resolver().roles_with_permission(Permission::ApproveQuote);
        assert_eq!(
            approvers,
            BTreeSet::from([Role::SystemAdmin, Role::Admin, Role::Manager])
        );

        let backups = resolver().roles_with_permission(Permission::BackupDatabase);
        assert_eq!(backups, BTreeSet::from([Role::SystemAdmin]));
    }

    #[test]
    fn authorities_include_role_and_permission_names() {
        let authorities = resolver().authorities([Role::HumanResources]);
        assert!(authorities.contains(&"ROLE_HUMAN_RESOURCES".to_string()));
        assert!(authorities.contains(&"APPROVE_TIMESHEETS".to_string()));
        assert!(!authorities.contains(&"APPROVE_QUOTE".to_string()));
        assert_eq!(authorities.len(), 1 + 13);
    }

    #[test]
    fn repeated_lookups_are_identical() {
        let resolver = resolver();
        for role in Role::ALL {
            assert_eq!(
                resolver.permissions_for_role(*role),
                resolver.permissions_for_role(*role)
            );
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: the effective set is the union of per-role sets and does
        /// not depend on the order roles are supplied in.
        #[test]
        fn union_is_order_independent(roles in prop::collection::vec(any_role(), 0..10)) {
            let resolver = resolver();

            let mut expected = BTreeSet::new();
            for role in &roles {
                expected.extend(resolver.permissions_for_role(*role));
            }

            let mut reversed = roles.clone();
            reversed.reverse();

            prop_assert_eq!(resolver.permissions_for_roles(&roles), expected.clone());
            prop_assert_eq!(resolver.permissions_for_roles(&reversed), expected);
        }

        /// Property: for two role sets with no shared permission, the gate on
        /// the combined set holds iff either side grants the permission.
        ///
        /// Each permission is granted to at most one role, so any two disjoint
        /// role sets also have disjoint permission sets.
        #[test]
        fn disjoint_role_sets_combine_by_membership(
            owners in prop::collection::vec(prop::option::of(any_role()), Permission::ALL.len()),
            left in prop::collection::btree_set(any_role(), 0..4),
            right in prop::collection::btree_set(any_role(), 0..4),
            permission in any_permission(),
        ) {
            let mut builder = RolePermissionMap::builder();
            for (p, owner) in Permission::ALL.iter().zip(&owners) {
                if let Some(role) = owner {
                    builder = builder.grant(*role, [*p]);
                }
            }
            let resolver = AuthorizationResolver::new(builder.build());

            let right: BTreeSet<Role> = right.difference(&left).copied().collect();
            let left_perms = resolver.permissions_for_roles(&left);
            let right_perms = resolver.permissions_for_roles(&right);
            prop_assert!(left_perms.is_disjoint(&right_perms));

            let combined: BTreeSet<Role> = left.union(&right).copied().collect();
            prop_assert_eq!(
                resolver.roles_have_permission(&combined, permission),
                left_perms.contains(&permission) || right_perms.contains(&permission)
            );
        }

        /// Property: the gate agrees with membership in the materialised union.
        #[test]
        fn gate_agrees_with_effective_set(
            roles in prop::collection::vec(any_role(), 0..6),
            permission in any_permission(),
        ) {
            let resolver = resolver();
            prop_assert_eq!(
                resolver.roles_have_permission(&roles, permission),
                resolver.permissions_for_roles(&roles).contains(&permission)
            );
        }
    }
}
