//! Analysis listing, lookup and deletion routes.

use actix_web::http::StatusCode;
use migration_report_lib::models::{InitialSavingsEstimationReportModel, PageBean};
use serde_json::Value;

use super::test_helpers::*;

#[actix_rt::test]
async fn test_missing_identity_is_forbidden_without_calls() {
    let ctx = TestContext::new();
    let analysis = ctx.seed_analysis().await;
    let app = create_test_app(&ctx).await;

    for path in [
        "/report".to_string(),
        format!("/report/{}", analysis.id),
        format!("/report/{}/workload-inventory", analysis.id),
        format!("/report/{}/workload-inventory/csv", analysis.id),
        format!("/report/{}/workload-summary/flags", analysis.id),
        format!("/report/{}/payload-link", analysis.id),
        "/administration/report/csv".to_string(),
    ] {
        let resp = get(&app, &path, None).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN, "{}", path);
        assert_eq!(body_text(resp).await, "Forbidden");
    }

    assert!(ctx.store.calls().is_empty());
}

#[actix_rt::test]
async fn test_undecodable_identity_is_forbidden() {
    let ctx = TestContext::new();
    let app = create_test_app(&ctx).await;

    let req = actix_web::test::TestRequest::get()
        .uri("/api/xavier/report")
        .insert_header(("x-rh-identity", "not-an-identity"))
        .to_request();
    let resp = actix_web::test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert!(ctx.store.calls().is_empty());
}

#[actix_rt::test]
async fn test_list_reports_uses_default_page() {
    let ctx = TestContext::new();
    ctx.seed_analysis().await;
    let app = create_test_app(&ctx).await;

    let resp = get(&app, "/report", Some(OWNER)).await;
    assert_eq!(resp.status(), StatusCode::OK);

    assert_eq!(
        ctx.store.calls(),
        vec![Call::FindAllByOwner {
            owner: OWNER.to_string(),
            page: PageBean::new(0, 10),
        }]
    );

    let body: Value = serde_json::from_str(&body_text(resp).await).unwrap();
    assert_eq!(body["totalElements"], 1);
    assert_eq!(body["content"][0]["reportName"], "report name");
    assert_eq!(body["size"], 10);
}

#[actix_rt::test]
async fn test_list_reports_binds_paging() {
    let ctx = TestContext::new();
    let app = create_test_app(&ctx).await;

    let resp = get(&app, "/report?page=2&size=3", Some(OWNER)).await;
    assert_eq!(resp.status(), StatusCode::OK);

    assert_eq!(
        ctx.store.calls(),
        vec![Call::FindAllByOwner {
            owner: OWNER.to_string(),
            page: PageBean::new(2, 3),
        }]
    );
}

#[actix_rt::test]
async fn test_list_reports_at_max_page_is_empty_last_page() {
    let ctx = TestContext::new();
    ctx.seed_analysis().await;
    let app = create_test_app(&ctx).await;

    let resp = get(&app, "/report?page=4294967295", Some(OWNER)).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = serde_json::from_str(&body_text(resp).await).unwrap();
    assert_eq!(body["content"], serde_json::json!([]));
    assert_eq!(body["number"], 4294967295u64);
    assert_eq!(body["totalElements"], 1);
    assert_eq!(body["last"], true);
    assert_eq!(body["empty"], true);
}

#[actix_rt::test]
async fn test_list_reports_with_filter_text_searches() {
    let ctx = TestContext::new();
    let app = create_test_app(&ctx).await;

    let resp = get(&app, "/report?filterText=report%20name&page=1", Some(OWNER)).await;
    assert_eq!(resp.status(), StatusCode::OK);

    assert_eq!(
        ctx.store.calls(),
        vec![Call::FindByOwnerAndReportName {
            owner: OWNER.to_string(),
            report_name: "report name".to_string(),
            page: PageBean::new(1, 10),
        }]
    );
}

#[actix_rt::test]
async fn test_blank_filter_text_lists_all() {
    let ctx = TestContext::new();
    let app = create_test_app(&ctx).await;

    let resp = get(&app, "/report?filterText=+", Some(OWNER)).await;
    assert_eq!(resp.status(), StatusCode::OK);

    assert!(matches!(
        ctx.store.calls().as_slice(),
        [Call::FindAllByOwner { .. }]
    ));
}

#[actix_rt::test]
async fn test_malformed_paging_is_bad_request() {
    let ctx = TestContext::new();
    let app = create_test_app(&ctx).await;

    for path in ["/report?page=abc", "/report?size=0", "/report?size=-5"] {
        let resp = get(&app, path, Some(OWNER)).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{}", path);
    }
    assert!(ctx.store.calls().is_empty());
}

#[actix_rt::test]
async fn test_non_numeric_id_is_bad_request() {
    let ctx = TestContext::new();
    let app = create_test_app(&ctx).await;

    let resp = get(&app, "/report/abc", Some(OWNER)).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(ctx.store.calls().is_empty());
}

#[actix_rt::test]
async fn test_get_report() {
    let ctx = TestContext::new();
    let analysis = ctx.seed_analysis().await;
    let app = create_test_app(&ctx).await;

    let resp = get(&app, &format!("/report/{}", analysis.id), Some(OWNER)).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = serde_json::from_str(&body_text(resp).await).unwrap();
    assert_eq!(body["id"], analysis.id);
    assert_eq!(body["owner"], OWNER);
    assert_eq!(
        ctx.store.calls(),
        vec![Call::FindByOwnerAndId {
            owner: OWNER.to_string(),
            id: analysis.id,
        }]
    );
}

#[actix_rt::test]
async fn test_get_report_of_other_owner_is_not_found() {
    let ctx = TestContext::new();
    let analysis = ctx.seed_analysis().await;
    let app = create_test_app(&ctx).await;

    let resp = get(&app, &format!("/report/{}", analysis.id), Some("someone@else.com")).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body: Value = serde_json::from_str(&body_text(resp).await).unwrap();
    assert_eq!(body["message"], "Analysis not found");
}

#[actix_rt::test]
async fn test_delete_missing_report_does_not_delete() {
    let ctx = TestContext::new();
    let app = create_test_app(&ctx).await;

    let resp = delete(&app, "/report/99", OWNER).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    assert_eq!(
        ctx.store.calls(),
        vec![Call::FindByOwnerAndId {
            owner: OWNER.to_string(),
            id: 99,
        }]
    );
}

#[actix_rt::test]
async fn test_delete_report() {
    let ctx = TestContext::new();
    let analysis = ctx.seed_analysis().await;
    let app = create_test_app(&ctx).await;

    let resp = delete(&app, &format!("/report/{}", analysis.id), OWNER).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert_eq!(body_text(resp).await, "");

    assert_eq!(
        ctx.store.count(|c| *c == Call::DeleteById(analysis.id)),
        1
    );

    ctx.store.clear_calls();
    let resp = get(&app, &format!("/report/{}", analysis.id), Some(OWNER)).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn test_initial_saving_estimation() {
    let ctx = TestContext::new();
    let analysis = ctx.seed_analysis().await;
    let app = create_test_app(&ctx).await;
    let path = format!("/report/{}/initial-saving-estimation", analysis.id);

    let resp = get(&app, &path, Some(OWNER)).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    ctx.store
        .store
        .set_initial_savings_estimation_report(
            analysis.id,
            InitialSavingsEstimationReportModel {
                customer_id: Some("CID123".to_string()),
                ..Default::default()
            },
        )
        .await;

    let resp = get(&app, &path, Some(OWNER)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = serde_json::from_str(&body_text(resp).await).unwrap();
    assert_eq!(body["customerId"], "CID123");
    assert_eq!(body["id"], analysis.id);

    assert_eq!(
        ctx.store.count(|c| matches!(
            c,
            Call::FindInitialSavings { owner, analysis_id } if owner == OWNER && *analysis_id == analysis.id
        )),
        2
    );
}

#[actix_rt::test]
async fn test_request_headers_are_not_echoed() {
    let ctx = TestContext::new();
    let app = create_test_app(&ctx).await;

    let req = actix_web::test::TestRequest::get()
        .uri("/api/xavier/report")
        .insert_header(("x-rh-identity", migration_report_lib::auth::encode_identity(OWNER)))
        .insert_header(("whatever", "value"))
        .to_request();
    let resp = actix_web::test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(header(&resp, "whatever").is_none());
    assert!(header(&resp, "x-rh-identity").is_none());
}

#[actix_rt::test]
async fn test_health_needs_no_identity() {
    let ctx = TestContext::new();
    let app = create_test_app(&ctx).await;

    let resp = get(&app, "/health", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = serde_json::from_str(&body_text(resp).await).unwrap();
    assert_eq!(body["status"], "healthy");
}
