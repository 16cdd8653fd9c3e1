use rust_decimal::Decimal;
use serde_json::json;
use spendtrack::aggregate::{self, StatusThresholds};
use spendtrack::auth::{MemoryStorage, SessionStorage, TOKEN_KEY};
use spendtrack::budgets::Budget;
use spendtrack::error::Error;
use spendtrack::expenses::NewExpense;
use spendtrack::income::NewIncome;
use spendtrack::reports::ReportRequest;
use spendtrack::views;
use spendtrack::SpendTrack;
use std::sync::Arc;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Match, Mock, MockServer, Request, ResponseTemplate};

fn client_for(server: &MockServer) -> SpendTrack {
    SpendTrack::new(&server.uri(), Arc::new(MemoryStorage::new()))
}

fn authed_client_for(server: &MockServer, token: &str) -> SpendTrack {
    let storage = MemoryStorage::new();
    storage.set(TOKEN_KEY, token).unwrap();
    SpendTrack::new(&server.uri(), Arc::new(storage))
}

/// Matches requests that carry no Authorization header
struct NoAuthorization;

impl Match for NoAuthorization {
    fn matches(&self, request: &Request) -> bool {
        !request
            .headers
            .iter()
            .any(|(name, _)| name.as_str().eq_ignore_ascii_case("authorization"))
    }
}

#[tokio::test]
async fn test_not_found_surfaces_backend_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/budget/u1"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "Not found"})))
        .mount(&mock_server)
        .await;

    let err = client_for(&mock_server)
        .budgets()
        .list("u1")
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Not found");
    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn test_unparsable_error_body_falls_back_to_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/category"))
        .respond_with(ResponseTemplate::new(500).set_body_string("<html>oops</html>"))
        .mount(&mock_server)
        .await;

    let err = client_for(&mock_server)
        .categories()
        .list()
        .await
        .unwrap_err();

    assert_eq!(err.message(), "HTTP error! status: 500");
}

#[tokio::test]
async fn test_error_field_is_used_when_message_is_missing() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/category/create"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"error": "Duplicate name"})))
        .mount(&mock_server)
        .await;

    let category = spendtrack::categories::NewCategory::new("Food", "").unwrap();
    let err = client_for(&mock_server)
        .categories()
        .create(&category)
        .await
        .unwrap_err();

    assert_eq!(err.message(), "Duplicate name");
}

#[tokio::test]
async fn test_bearer_token_is_attached_when_stored() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/expense/user/u1"))
        .and(header("authorization", "Bearer abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let expenses = authed_client_for(&mock_server, "abc123")
        .expenses()
        .list("u1")
        .await
        .unwrap();

    assert!(expenses.is_empty());
}

#[tokio::test]
async fn test_no_authorization_header_without_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/category"))
        .and(NoAuthorization)
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    client_for(&mock_server).categories().list().await.unwrap();
}

#[tokio::test]
async fn test_writes_send_json() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/expense/add"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({
            "description": "Groceries",
            "amount": 42.5,
            "date": "2026-10-17T00:00:00.000Z",
            "category_id": "c1",
            "userId": "u1"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let expense = NewExpense::new(
        "Groceries",
        Decimal::new(425, 1),
        "2026-10-17",
        "c1",
        None,
        "u1",
    )
    .unwrap();

    client_for(&mock_server)
        .expenses()
        .create(&expense)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_list_accepts_every_envelope_shape() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/budget/bare"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"_id": "b1", "description": "Food", "amount": 100}
        ])))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/budget/wrapped"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"_id": "b1", "description": "Food", "amount": "100"}]
        })))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/budget/flagged"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [{"id": "b1", "description": "Food", "amount": 100}]
        })))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/budget/failed"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "error": "User not found"
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    for user in ["bare", "wrapped", "flagged"] {
        let budgets = client.budgets().list(user).await.unwrap();
        assert_eq!(budgets.len(), 1, "shape {}", user);
        assert_eq!(budgets[0].id, "b1");
        assert_eq!(budgets[0].amount, Decimal::new(100, 0));
    }

    let err = client.budgets().list("failed").await.unwrap_err();
    assert!(matches!(err, Error::Api(_)));
    assert_eq!(err.message(), "User not found");
}

#[tokio::test]
async fn test_list_tolerates_duplicate_ids_and_numeric_dates() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/budget/u1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "_id": "b1",
                "id": "b1",
                "description": "Rent",
                "amount": 900,
                "end_date": 1700000000000u64,
                "user_id": "u1",
                "userId": "u1"
            },
            {"id": "b2", "description": "Food", "amount": "150", "endDate": "2026-10-20"}
        ])))
        .mount(&mock_server)
        .await;

    let budgets = client_for(&mock_server).budgets().list("u1").await.unwrap();

    assert_eq!(budgets.len(), 2);
    assert_eq!(budgets[0].id, "b1");
    assert_eq!(budgets[0].end_date, None);
    assert_eq!(budgets[1].id, "b2");
    assert_eq!(budgets[1].end_date.as_deref(), Some("2026-10-20"));
}

#[tokio::test]
async fn test_ids_are_sent_as_single_path_segments() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/expense/e%201%2F2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&mock_server)
        .await;

    client_for(&mock_server)
        .expenses()
        .delete("e 1/2")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_income_update_sends_owner_as_query() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/income/i1"))
        .and(query_param("userId", "u1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/income/i1"))
        .and(query_param("userId", "u1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let income = NewIncome::new("Salary", Decimal::new(3000, 0), "2026-10-01", "", "u1").unwrap();
    client.income().update("i1", "u1", &income).await.unwrap();

    let deleted = client.income().delete("i1", "u1").await.unwrap();
    assert!(deleted.is_null());
}

#[tokio::test]
async fn test_create_then_list_shows_one_new_record() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/income/user/u1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"_id": "i1", "source": "Salary", "amount": 3000}
        ])))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/income/add"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "_id": "i2", "source": "Gift", "amount": 50
        })))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/income/user/u1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [
                {"_id": "i1", "source": "Salary", "amount": 3000},
                {"_id": "i2", "source": "Gift", "amount": 50}
            ]
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let before = client.income().list("u1").await.unwrap();

    let income = NewIncome::new("Gift", Decimal::new(50, 0), "2026-10-17", "", "u1").unwrap();
    client.income().create(&income).await.unwrap();

    let after = client.income().list("u1").await.unwrap();
    assert_eq!(after.len(), before.len() + 1);
    let new: Vec<_> = after
        .iter()
        .filter(|i| !before.iter().any(|b| b.id == i.id))
        .collect();
    assert_eq!(new.len(), 1);
    assert_eq!(new[0].source, "Gift");
}

#[tokio::test]
async fn test_track_budget_without_income_makes_no_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"totalSpending": 0})))
        .expect(0)
        .mount(&mock_server)
        .await;

    let budget: Budget = serde_json::from_value(json!({
        "_id": "b1", "description": "Holiday", "amount": 500
    }))
    .unwrap();

    let err = aggregate::track_budget(
        &client_for(&mock_server),
        &budget,
        "u1",
        &StatusThresholds::default(),
    )
    .await
    .unwrap_err();

    assert!(err.is_validation());
}

#[tokio::test]
async fn test_track_budget_measures_reported_spending() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/budget/view/u1/inc1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "totalSpending": 450,
            "remainingBudget": 50,
            "status": "Warning"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let budget: Budget = serde_json::from_value(json!({
        "_id": "b1", "description": "Holiday", "amount": 500, "incomeId": "inc1"
    }))
    .unwrap();

    let tracking = aggregate::track_budget(
        &client_for(&mock_server),
        &budget,
        "u1",
        &StatusThresholds::default(),
    )
    .await
    .unwrap();

    assert_eq!(tracking.budget_id, "b1");
    assert_eq!(tracking.progress.spending, Decimal::new(450, 0));
    assert_eq!(tracking.progress.remaining, Decimal::new(50, 0));
    assert_eq!(tracking.progress.status, aggregate::BudgetStatus::NearLimit);
    assert_eq!(tracking.server_status.as_deref(), Some("Warning"));
}

#[tokio::test]
async fn test_report_requires_a_budget() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&mock_server)
        .await;

    let err = client_for(&mock_server)
        .reports()
        .create(&ReportRequest {
            user_id: "u1".to_string(),
            budget_id: String::new(),
        })
        .await
        .unwrap_err();

    assert_eq!(err.message(), "Please select a budget");
}

#[tokio::test]
async fn test_report_is_unwrapped_from_envelope() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/report/createReport"))
        .and(body_json(json!({"user_id": "u1", "budget_id": "b1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {
                "startDate": "2026-10-01",
                "endDate": "2026-10-31",
                "totalIncome": 3000,
                "totalExpenses": 1200.5,
                "balance": 1799.5
            }
        })))
        .mount(&mock_server)
        .await;

    let report = client_for(&mock_server)
        .reports()
        .create(&ReportRequest {
            user_id: "u1".to_string(),
            budget_id: "b1".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(report.total_income, Decimal::new(3000, 0));
    assert_eq!(report.balance, Decimal::new(17995, 1));
    assert!(report.to_csv().unwrap().contains("Balance,1799.50"));
}

async fn mount_list(server: &MockServer, endpoint: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(endpoint))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_dashboard_loads_all_three_lists() {
    let mock_server = MockServer::start().await;

    mount_list(
        &mock_server,
        "/budget/u1",
        json!([{"_id": "b1", "description": "Living", "amount": 1000}]),
    )
    .await;
    mount_list(
        &mock_server,
        "/expense/user/u1",
        json!([{"_id": "e1", "description": "Rent", "amount": 800, "budget_id": "b1", "date": "2026-10-02"}]),
    )
    .await;
    mount_list(
        &mock_server,
        "/income/user/u1",
        json!({"data": [{"_id": "i1", "source": "Salary", "amount": 2000, "date": "2026-10-01"}]}),
    )
    .await;

    let dashboard = views::load_dashboard(&client_for(&mock_server), "u1")
        .await
        .unwrap();

    assert_eq!(dashboard.summary.total_income, Decimal::new(2000, 0));
    assert_eq!(dashboard.summary.total_expenses, Decimal::new(800, 0));
    assert_eq!(dashboard.summary.balance, Decimal::new(1200, 0));
    assert_eq!(dashboard.summary.recent.len(), 2);
    assert_eq!(
        dashboard.summary.budgets[0].progress.status,
        aggregate::BudgetStatus::NearLimit
    );
}

#[tokio::test]
async fn test_dashboard_fails_as_a_whole() {
    let mock_server = MockServer::start().await;

    mount_list(&mock_server, "/budget/u1", json!([])).await;
    mount_list(&mock_server, "/income/user/u1", json!([])).await;
    Mock::given(method("GET"))
        .and(path("/expense/user/u1"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let err = views::load_dashboard(&client_for(&mock_server), "u1")
        .await
        .unwrap_err();

    assert_eq!(err.message(), "HTTP error! status: 500");
}

#[tokio::test]
async fn test_expense_ledger_joins_categories_and_budgets() {
    let mock_server = MockServer::start().await;

    mount_list(
        &mock_server,
        "/category",
        json!([{"_id": "c1", "name": "Food"}]),
    )
    .await;
    mount_list(
        &mock_server,
        "/expense/user/u1",
        json!([
            {"_id": "e1", "description": "Lunch", "amount": 12, "category_id": {"_id": "c1", "name": "Food"}},
            {"_id": "e2", "description": "Misc", "amount": 8}
        ]),
    )
    .await;
    mount_list(
        &mock_server,
        "/budget/u1",
        json!([{"_id": "b1", "description": "Monthly", "amount": 100}]),
    )
    .await;

    let ledger = views::load_expense_ledger(&client_for(&mock_server), "u1")
        .await
        .unwrap();

    assert_eq!(ledger.rows.len(), 2);
    assert_eq!(ledger.rows[0].category, "Food");
    assert_eq!(ledger.rows[1].category, "Uncategorized");
    assert_eq!(ledger.rows[1].budget, "No Budget");
    assert_eq!(ledger.by_category.get("Food").unwrap().percentage, 60.0);
}

#[tokio::test]
async fn test_unreachable_backend_is_a_transport_error() {
    let client = SpendTrack::new("http://127.0.0.1:9", Arc::new(MemoryStorage::new()));

    let err = client.categories().list().await.unwrap_err();

    assert!(matches!(err, Error::Transport(_)));
    assert!(err.message().starts_with("Network request failed"));
}
