//! Administration CSV route.

use actix_web::http::StatusCode;

use super::test_helpers::*;

#[actix_rt::test]
async fn test_non_admin_is_forbidden() {
    let ctx = TestContext::new();
    let app = create_test_app(&ctx).await;

    let resp = get(&app, "/administration/report/csv", Some(OWNER)).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_text(resp).await, "Forbidden");
    assert!(ctx.store.calls().is_empty());
}

#[actix_rt::test]
async fn test_admin_csv_computes_two_periods() {
    let ctx = TestContext::new();
    let analysis = ctx.seed_analysis().await;
    ctx.store
        .store
        .set_payload(analysis.id, "payload", 2048)
        .await
        .unwrap();
    ctx.store
        .store
        .add_workload_inventory_report_models(
            vec![
                inventory_row("P", "D", "C", "vm1"),
                inventory_row("P", "D", "C", "vm2"),
            ],
            analysis.id,
        )
        .await
        .unwrap();
    let app = create_test_app(&ctx).await;

    let resp = get(&app, "/administration/report/csv", Some(ADMIN)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(header(&resp, "content-type"), Some("text/csv"));

    let disposition = header(&resp, "content-disposition").unwrap().to_string();
    assert!(disposition.starts_with("attachment;filename=administration_report_"));
    assert!(disposition.ends_with(".csv"));

    let csv = body_text(resp).await;
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "Period,From,To,Reports,Users,VMs,Payloads size (bytes)");
    assert_eq!(lines.len(), 3);
    assert!(lines[1].starts_with("Last 7 days,"));
    assert!(lines[1].ends_with(",1,1,2,2048"));
    assert!(lines[2].starts_with("All time,1970-01-01,"));

    assert_eq!(
        ctx.store.count(|c| *c == Call::GetAdministrationMetrics),
        2
    );
}
