use async_graphql::{ID, SimpleObject};
use platform_authn::User;
use platform_authz::AccessControl;

#[derive(Clone, Debug, SimpleObject)]
pub struct MePayload {
    pub id: ID,
    pub name: String,
    pub email: String,
    pub role: String,
    pub employee_id: ID,
    /// Granted actions on the caller's own employee record.
    pub permissions: Vec<String>,
}

impl MePayload {
    pub fn from_requester(user: &User, access: &AccessControl) -> Self {
        Self {
            id: ID(user.id.clone()),
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role.to_string(),
            employee_id: ID(user.employee_id.to_string()),
            permissions: access
                .permitted_actions(Some(&user.employee_id))
                .into_iter()
                .map(|action| action.to_string())
                .collect(),
        }
    }
}
