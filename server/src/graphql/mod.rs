mod me;
mod types;

use async_graphql::{Context, EmptySubscription, Error, ErrorExtensions, ID, Object, Schema};
use chrono::Utc;
use platform_api::ApiError;
use platform_authn::User;
use platform_authz::{AccessControl, EmployeeId};
use products_hr::{AbsenceDraft, FeedbackDraft, HrError, HrService};
use tracing::instrument;

use self::{
    me::MePayload,
    types::{
        AbsenceDecisionValue, AbsenceRequestInput, AbsenceRequestNode, AbsenceStatsNode,
        EmployeeNode, FeedbackNode, ProfileUpdateInput,
    },
};

pub type SchemaType = Schema<QueryRoot, MutationRoot, EmptySubscription>;

pub fn build_schema(service: HrService) -> SchemaType {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(service)
        .finish()
}

/// Per-request caller, attached by the HTTP layer. Missing means anonymous.
#[derive(Clone, Debug, Default)]
pub struct Requester {
    pub user: Option<User>,
    pub access: AccessControl,
}

impl Requester {
    pub fn new(user: Option<User>) -> Self {
        let access = AccessControl::new(user.as_ref().map(User::actor));
        Self { user, access }
    }
}

#[derive(Default)]
pub struct QueryRoot;

#[derive(Default)]
pub struct MutationRoot;

#[Object]
impl QueryRoot {
    #[instrument(name = "graphql.me", skip_all)]
    async fn me(&self, ctx: &Context<'_>) -> async_graphql::Result<Option<MePayload>> {
        let requester = requester(ctx);
        Ok(requester
            .user
            .as_ref()
            .map(|user| MePayload::from_requester(user, &requester.access)))
    }

    #[instrument(name = "graphql.employee", skip_all)]
    async fn employee(&self, ctx: &Context<'_>, id: ID) -> async_graphql::Result<EmployeeNode> {
        let id = parse_employee_id(&id)?;
        service(ctx)?
            .profile(&requester(ctx).access, &id)
            .map(EmployeeNode::from)
            .map_err(hr_error)
    }

    #[instrument(name = "graphql.team", skip_all)]
    async fn team(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<EmployeeNode>> {
        let views = service(ctx)?
            .team(&requester(ctx).access)
            .map_err(hr_error)?;
        Ok(views.into_iter().map(EmployeeNode::from).collect())
    }

    #[instrument(name = "graphql.feedback", skip_all)]
    async fn feedback(
        &self,
        ctx: &Context<'_>,
        employee_id: ID,
    ) -> async_graphql::Result<Vec<FeedbackNode>> {
        let id = parse_employee_id(&employee_id)?;
        let entries = service(ctx)?
            .feedback_for(&requester(ctx).access, &id)
            .map_err(hr_error)?;
        Ok(entries.into_iter().map(FeedbackNode::from).collect())
    }

    #[instrument(name = "graphql.absence_requests", skip_all)]
    async fn absence_requests(
        &self,
        ctx: &Context<'_>,
        employee_id: ID,
    ) -> async_graphql::Result<Vec<AbsenceRequestNode>> {
        let id = parse_employee_id(&employee_id)?;
        let requests = service(ctx)?
            .absence_requests_for(&requester(ctx).access, &id)
            .map_err(hr_error)?;
        Ok(requests.into_iter().map(AbsenceRequestNode::from).collect())
    }

    #[instrument(name = "graphql.pending_absence_requests", skip_all)]
    async fn pending_absence_requests(
        &self,
        ctx: &Context<'_>,
    ) -> async_graphql::Result<Vec<AbsenceRequestNode>> {
        let requests = service(ctx)?
            .pending_absence_requests(&requester(ctx).access)
            .map_err(hr_error)?;
        Ok(requests.into_iter().map(AbsenceRequestNode::from).collect())
    }

    #[instrument(name = "graphql.all_absence_requests", skip_all)]
    async fn all_absence_requests(
        &self,
        ctx: &Context<'_>,
    ) -> async_graphql::Result<Vec<AbsenceRequestNode>> {
        let requests = service(ctx)?
            .all_absence_requests(&requester(ctx).access)
            .map_err(hr_error)?;
        Ok(requests.into_iter().map(AbsenceRequestNode::from).collect())
    }

    /// Counts for one employee; defaults to the caller's own record.
    #[instrument(name = "graphql.absence_stats", skip_all)]
    async fn absence_stats(
        &self,
        ctx: &Context<'_>,
        employee_id: Option<ID>,
    ) -> async_graphql::Result<AbsenceStatsNode> {
        let requester = requester(ctx);
        let id = match employee_id {
            Some(id) => parse_employee_id(&id)?,
            None => requester
                .access
                .actor()
                .map(|actor| actor.employee_id.clone())
                .ok_or_else(|| ApiError::Unauthorized.extend())?,
        };
        service(ctx)?
            .absence_stats_for(&requester.access, &id)
            .map(AbsenceStatsNode::from)
            .map_err(hr_error)
    }

    #[instrument(name = "graphql.team_absence_stats", skip_all)]
    async fn team_absence_stats(&self, ctx: &Context<'_>) -> async_graphql::Result<AbsenceStatsNode> {
        service(ctx)?
            .team_absence_stats(&requester(ctx).access)
            .map(AbsenceStatsNode::from)
            .map_err(hr_error)
    }

    /// Action names granted to the caller, optionally against an employee.
    async fn permissions(
        &self,
        ctx: &Context<'_>,
        employee_id: Option<ID>,
    ) -> async_graphql::Result<Vec<String>> {
        let target = employee_id.as_ref().map(parse_employee_id).transpose()?;
        Ok(requester(ctx)
            .access
            .permitted_actions(target.as_ref())
            .into_iter()
            .map(|action| action.to_string())
            .collect())
    }

    /// Unknown action names answer `false`.
    async fn can(
        &self,
        ctx: &Context<'_>,
        action: String,
        employee_id: Option<ID>,
    ) -> async_graphql::Result<bool> {
        let target = employee_id.as_ref().map(parse_employee_id).transpose()?;
        Ok(requester(ctx).access.check_named(&action, target.as_ref()))
    }

    async fn denial_message(&self, ctx: &Context<'_>, action: String) -> String {
        requester(ctx).access.describe_denial_named(&action).to_string()
    }

    async fn version(&self) -> String {
        env!("CARGO_PKG_VERSION").to_string()
    }
}

#[Object]
impl MutationRoot {
    #[instrument(name = "graphql.update_profile", skip_all)]
    async fn update_profile(
        &self,
        ctx: &Context<'_>,
        id: ID,
        input: ProfileUpdateInput,
    ) -> async_graphql::Result<EmployeeNode> {
        let id = parse_employee_id(&id)?;
        service(ctx)?
            .update_profile(&requester(ctx).access, &id, input.into())
            .map(EmployeeNode::from)
            .map_err(hr_error)
    }

    #[instrument(name = "graphql.polish_feedback", skip_all)]
    async fn polish_feedback(&self, ctx: &Context<'_>, text: String) -> async_graphql::Result<String> {
        service(ctx)?
            .polish_preview(&requester(ctx).access, &text)
            .map_err(hr_error)
    }

    #[instrument(name = "graphql.leave_feedback", skip_all)]
    async fn leave_feedback(
        &self,
        ctx: &Context<'_>,
        employee_id: ID,
        content: String,
        #[graphql(default = false)] polish: bool,
    ) -> async_graphql::Result<FeedbackNode> {
        let id = parse_employee_id(&employee_id)?;
        service(ctx)?
            .leave_feedback(
                &requester(ctx).access,
                &id,
                FeedbackDraft { content, polish },
            )
            .map(FeedbackNode::from)
            .map_err(hr_error)
    }

    #[instrument(name = "graphql.request_absence", skip_all)]
    async fn request_absence(
        &self,
        ctx: &Context<'_>,
        input: AbsenceRequestInput,
    ) -> async_graphql::Result<AbsenceRequestNode> {
        let draft = AbsenceDraft {
            kind: input.kind.into(),
            start_date: input.start_date,
            end_date: input.end_date,
            reason: input.reason,
        };
        service(ctx)?
            .request_absence(&requester(ctx).access, draft, Utc::now().date_naive())
            .map(AbsenceRequestNode::from)
            .map_err(hr_error)
    }

    #[instrument(name = "graphql.decide_absence", skip_all)]
    async fn decide_absence(
        &self,
        ctx: &Context<'_>,
        id: ID,
        decision: AbsenceDecisionValue,
    ) -> async_graphql::Result<AbsenceRequestNode> {
        service(ctx)?
            .decide_absence(&requester(ctx).access, id.as_str(), decision.into())
            .map(AbsenceRequestNode::from)
            .map_err(hr_error)
    }
}

fn service<'a>(ctx: &Context<'a>) -> async_graphql::Result<&'a HrService> {
    ctx.data::<HrService>()
}

fn requester(ctx: &Context<'_>) -> Requester {
    ctx.data_opt::<Requester>().cloned().unwrap_or_default()
}

fn parse_employee_id(id: &ID) -> async_graphql::Result<EmployeeId> {
    EmployeeId::parse(id.as_str()).map_err(|err| ApiError::InvalidInput(err.to_string()).extend())
}

fn hr_error(err: HrError) -> Error {
    let api = match err {
        HrError::Unauthenticated => ApiError::Unauthorized,
        HrError::Forbidden { message, .. } => ApiError::Forbidden(message),
        HrError::NotFound(_) => ApiError::NotFound,
        HrError::Invalid(message) => ApiError::InvalidInput(message),
        HrError::Conflict(message) => ApiError::Conflict(message),
    };
    api.extend()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_graphql::{Request, Value};
    use platform_authn::UserDirectory;
    use products_hr::{HrStore, PatternPolisher};
    use serde_json::json;

    use super::*;

    fn schema() -> SchemaType {
        let polisher = PatternPolisher::new().unwrap();
        build_schema(HrService::new(Arc::new(HrStore::seeded()), Arc::new(polisher)))
    }

    fn as_user(query: &str, user_id: &str) -> Request {
        let user = UserDirectory::demo().get(user_id).cloned();
        Request::new(query).data(Requester::new(user))
    }

    fn error_code(response: &async_graphql::Response) -> Option<Value> {
        response.errors[0]
            .extensions
            .as_ref()
            .and_then(|ext| ext.get("code"))
            .cloned()
    }

    #[tokio::test]
    async fn coworker_profile_view_hides_sensitive_fields() {
        let response = schema()
            .execute(as_user(r#"{ employee(id: "1") { name sensitive { salary } } }"#, "3"))
            .await;
        assert!(response.errors.is_empty(), "{:?}", response.errors);
        assert_eq!(
            response.data.into_json().unwrap(),
            json!({"employee": {"name": "Sarah Johnson", "sensitive": null}})
        );
    }

    #[tokio::test]
    async fn team_is_forbidden_for_employees() {
        let response = schema().execute(as_user("{ team { id } }", "2")).await;
        assert_eq!(error_code(&response), Some(Value::from("FORBIDDEN")));
        assert_eq!(
            response.errors[0].message,
            "forbidden: Team overview is only available to managers."
        );
    }

    #[tokio::test]
    async fn anonymous_requests_are_unauthorized_and_denied() {
        let schema = schema();
        let response = schema.execute(Request::new("{ team { id } }")).await;
        assert_eq!(error_code(&response), Some(Value::from("UNAUTHORIZED")));

        let response = schema
            .execute(Request::new(
                r#"{ me { id } can(action: "canViewTeam") denialMessage(action: "canViewTeam") }"#,
            ))
            .await;
        assert!(response.errors.is_empty(), "{:?}", response.errors);
        assert_eq!(
            response.data.into_json().unwrap(),
            json!({"me": null, "can": false, "denialMessage": "Please log in to continue."})
        );
    }

    #[tokio::test]
    async fn me_lists_permissions_on_own_record() {
        let response = schema()
            .execute(as_user("{ me { name role employeeId permissions } }", "2"))
            .await;
        assert!(response.errors.is_empty(), "{:?}", response.errors);
        assert_eq!(
            response.data.into_json().unwrap(),
            json!({"me": {
                "name": "Sarah Johnson",
                "role": "employee",
                "employeeId": "1",
                "permissions": [
                    "canViewProfile",
                    "canEditProfile",
                    "canViewSensitiveData",
                    "canViewFeedback",
                    "canRequestAbsence",
                    "canViewAbsenceRequests"
                ]
            }})
        );
    }

    #[tokio::test]
    async fn manager_approves_a_pending_request_once() {
        let schema = schema();
        let start = Utc::now().date_naive().to_string();
        let submit = format!(
            r#"mutation {{ requestAbsence(input: {{kind: PERSONAL, startDate: "{start}", endDate: "{start}", reason: "Errand"}}) {{ id status days }} }}"#
        );
        let response = schema.execute(as_user(&submit, "3")).await;
        assert!(response.errors.is_empty(), "{:?}", response.errors);
        let data = response.data.into_json().unwrap();
        assert_eq!(data["requestAbsence"]["status"], json!("PENDING"));
        assert_eq!(data["requestAbsence"]["days"], json!(1));
        let id = data["requestAbsence"]["id"].as_str().unwrap().to_string();

        let decide = format!(r#"mutation {{ decideAbsence(id: "{id}", decision: APPROVE) {{ status }} }}"#);
        let response = schema.execute(as_user(&decide, "1")).await;
        assert!(response.errors.is_empty(), "{:?}", response.errors);
        assert_eq!(
            response.data.into_json().unwrap(),
            json!({"decideAbsence": {"status": "APPROVED"}})
        );

        let response = schema.execute(as_user(&decide, "1")).await;
        assert_eq!(error_code(&response), Some(Value::from("CONFLICT")));
    }

    #[tokio::test]
    async fn manager_reads_all_requests_and_stats() {
        let schema = schema();
        let response = schema
            .execute(as_user(
                "{ allAbsenceRequests { status } teamAbsenceStats { total pending approved rejected } absenceStats { total } }",
                "1",
            ))
            .await;
        assert!(response.errors.is_empty(), "{:?}", response.errors);
        assert_eq!(
            response.data.into_json().unwrap(),
            json!({
                "allAbsenceRequests": [{"status": "APPROVED"}, {"status": "APPROVED"}],
                "teamAbsenceStats": {"total": 2, "pending": 0, "approved": 2, "rejected": 0},
                "absenceStats": {"total": 0}
            })
        );

        let response = schema
            .execute(as_user("{ teamAbsenceStats { total } }", "3"))
            .await;
        assert_eq!(error_code(&response), Some(Value::from("FORBIDDEN")));

        let response = schema
            .execute(Request::new("{ absenceStats { total } }"))
            .await;
        assert_eq!(error_code(&response), Some(Value::from("UNAUTHORIZED")));
    }

    #[tokio::test]
    async fn employee_updates_own_email() {
        let response = schema()
            .execute(as_user(
                r#"mutation { updateProfile(id: "1", input: {email: "sarah.j@company.com"}) { email } }"#,
                "2",
            ))
            .await;
        assert!(response.errors.is_empty(), "{:?}", response.errors);
        assert_eq!(
            response.data.into_json().unwrap(),
            json!({"updateProfile": {"email": "sarah.j@company.com"}})
        );
    }

    #[tokio::test]
    async fn coworker_leaves_polished_feedback() {
        let response = schema()
            .execute(as_user(
                r#"mutation { leaveFeedback(employeeId: "1", content: "good pairing session", polish: true) { content isPolished originalContent authorName } }"#,
                "3",
            ))
            .await;
        assert!(response.errors.is_empty(), "{:?}", response.errors);
        assert_eq!(
            response.data.into_json().unwrap(),
            json!({"leaveFeedback": {
                "content": "Excellent pairing session. This demonstrates strong professional capabilities and positive collaboration skills.",
                "isPolished": true,
                "originalContent": "good pairing session",
                "authorName": "Alex Rivera"
            }})
        );
    }

    #[tokio::test]
    async fn blank_employee_id_is_invalid_input() {
        let response = schema()
            .execute(as_user(r#"{ employee(id: " ") { id } }"#, "1"))
            .await;
        assert_eq!(error_code(&response), Some(Value::from("INVALID_INPUT")));
    }
}
