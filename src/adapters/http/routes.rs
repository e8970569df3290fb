use actix_web::web;
use std::sync::Arc;

use crate::application::billing::{
  AddWorkLineUseCase, CreateCustomerUseCase, CreateItemUseCase, DeleteCustomerUseCase,
  DeleteItemUseCase, DeleteWorkLineUseCase, IssueInvoiceUseCase, ListCustomersUseCase,
  ListInvoicesUseCase, ListItemsUseCase, ListPendingUseCase, ListWorkLinesUseCase,
  PrintInvoiceUseCase, ReverseInvoiceUseCase, UpdateCustomerUseCase, UpdateItemUseCase,
  UpdateWorkLineUseCase,
};
use crate::application::mirror::StateMirror;
use crate::domain::billing::{BillingService, InvoiceRenderer};

use super::handlers::{customers, invoices, items, work_lines};

/// Use cases served by the billing API
#[derive(Clone)]
pub struct BillingRouteDependencies {
  pub create_customer_use_case: Arc<CreateCustomerUseCase>,
  pub update_customer_use_case: Arc<UpdateCustomerUseCase>,
  pub delete_customer_use_case: Arc<DeleteCustomerUseCase>,
  pub list_customers_use_case: Arc<ListCustomersUseCase>,
  pub create_item_use_case: Arc<CreateItemUseCase>,
  pub update_item_use_case: Arc<UpdateItemUseCase>,
  pub delete_item_use_case: Arc<DeleteItemUseCase>,
  pub list_items_use_case: Arc<ListItemsUseCase>,
  pub add_work_line_use_case: Arc<AddWorkLineUseCase>,
  pub update_work_line_use_case: Arc<UpdateWorkLineUseCase>,
  pub delete_work_line_use_case: Arc<DeleteWorkLineUseCase>,
  pub list_work_lines_use_case: Arc<ListWorkLinesUseCase>,
  pub list_pending_use_case: Arc<ListPendingUseCase>,
  pub issue_invoice_use_case: Arc<IssueInvoiceUseCase>,
  pub reverse_invoice_use_case: Arc<ReverseInvoiceUseCase>,
  pub list_invoices_use_case: Arc<ListInvoicesUseCase>,
  pub print_invoice_use_case: Arc<PrintInvoiceUseCase>,
}

impl BillingRouteDependencies {
  /// Wires every use case to one billing service and state mirror
  pub fn new(
    billing_service: Arc<BillingService>,
    mirror: Arc<StateMirror>,
    renderer: Arc<dyn InvoiceRenderer>,
  ) -> Self {
    let svc = || billing_service.clone();
    let mir = || mirror.clone();

    Self {
      create_customer_use_case: Arc::new(CreateCustomerUseCase::new(svc(), mir())),
      update_customer_use_case: Arc::new(UpdateCustomerUseCase::new(svc(), mir())),
      delete_customer_use_case: Arc::new(DeleteCustomerUseCase::new(svc(), mir())),
      list_customers_use_case: Arc::new(ListCustomersUseCase::new(svc())),
      create_item_use_case: Arc::new(CreateItemUseCase::new(svc(), mir())),
      update_item_use_case: Arc::new(UpdateItemUseCase::new(svc(), mir())),
      delete_item_use_case: Arc::new(DeleteItemUseCase::new(svc(), mir())),
      list_items_use_case: Arc::new(ListItemsUseCase::new(svc())),
      add_work_line_use_case: Arc::new(AddWorkLineUseCase::new(svc(), mir())),
      update_work_line_use_case: Arc::new(UpdateWorkLineUseCase::new(svc(), mir())),
      delete_work_line_use_case: Arc::new(DeleteWorkLineUseCase::new(svc(), mir())),
      list_work_lines_use_case: Arc::new(ListWorkLinesUseCase::new(svc())),
      list_pending_use_case: Arc::new(ListPendingUseCase::new(svc(), mir())),
      issue_invoice_use_case: Arc::new(IssueInvoiceUseCase::new(svc(), mir())),
      reverse_invoice_use_case: Arc::new(ReverseInvoiceUseCase::new(svc(), mir())),
      list_invoices_use_case: Arc::new(ListInvoicesUseCase::new(svc(), mir())),
      print_invoice_use_case: Arc::new(PrintInvoiceUseCase::new(svc(), mir(), renderer)),
    }
  }
}

/// Configure billing API routes
///
/// Mounts the billing endpoints under the provided scope (e.g. /api/v1).
///
/// # Routes
///
/// - GET/POST /customers, PUT/DELETE /customers/{id}
/// - GET/POST /items, PUT/DELETE /items/{id}
/// - GET/POST /work-lines, PUT/DELETE /work-lines/{id}
/// - GET /pending, GET /pending/{customer_id}
/// - GET/POST /invoices, DELETE /invoices/{id}, GET /invoices/{id}/print
pub fn configure_billing_routes(cfg: &mut web::ServiceConfig, deps: BillingRouteDependencies) {
  cfg
    .app_data(web::Data::new(deps.create_customer_use_case))
    .app_data(web::Data::new(deps.update_customer_use_case))
    .app_data(web::Data::new(deps.delete_customer_use_case))
    .app_data(web::Data::new(deps.list_customers_use_case))
    .app_data(web::Data::new(deps.create_item_use_case))
    .app_data(web::Data::new(deps.update_item_use_case))
    .app_data(web::Data::new(deps.delete_item_use_case))
    .app_data(web::Data::new(deps.list_items_use_case))
    .app_data(web::Data::new(deps.add_work_line_use_case))
    .app_data(web::Data::new(deps.update_work_line_use_case))
    .app_data(web::Data::new(deps.delete_work_line_use_case))
    .app_data(web::Data::new(deps.list_work_lines_use_case))
    .app_data(web::Data::new(deps.list_pending_use_case))
    .app_data(web::Data::new(deps.issue_invoice_use_case))
    .app_data(web::Data::new(deps.reverse_invoice_use_case))
    .app_data(web::Data::new(deps.list_invoices_use_case))
    .app_data(web::Data::new(deps.print_invoice_use_case))
    .service(
      web::resource("/customers")
        .route(web::get().to(customers::list_customers_handler))
        .route(web::post().to(customers::create_customer_handler)),
    )
    .service(
      web::resource("/customers/{id}")
        .route(web::put().to(customers::update_customer_handler))
        .route(web::delete().to(customers::delete_customer_handler)),
    )
    .service(
      web::resource("/items")
        .route(web::get().to(items::list_items_handler))
        .route(web::post().to(items::create_item_handler)),
    )
    .service(
      web::resource("/items/{id}")
        .route(web::put().to(items::update_item_handler))
        .route(web::delete().to(items::delete_item_handler)),
    )
    .service(
      web::resource("/work-lines")
        .route(web::get().to(work_lines::list_work_lines_handler))
        .route(web::post().to(work_lines::create_work_line_handler)),
    )
    .service(
      web::resource("/work-lines/{id}")
        .route(web::put().to(work_lines::update_work_line_handler))
        .route(web::delete().to(work_lines::delete_work_line_handler)),
    )
    .route("/pending", web::get().to(invoices::list_pending_handler))
    .route(
      "/pending/{customer_id}",
      web::get().to(invoices::customer_pending_handler),
    )
    .service(
      web::resource("/invoices")
        .route(web::get().to(invoices::list_invoices_handler))
        .route(web::post().to(invoices::issue_invoice_handler)),
    )
    .route(
      "/invoices/{id}",
      web::delete().to(invoices::reverse_invoice_handler),
    )
    .route(
      "/invoices/{id}/print",
      web::get().to(invoices::print_invoice_handler),
    );
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::billing::BillingServiceDependencies;
  use crate::infrastructure::persistence::memory::InMemoryBillingStore;
  use crate::infrastructure::print::HtmlInvoiceRenderer;
  use actix_web::{App, http::StatusCode, test};
  use serde_json::{Value, json};

  fn deps() -> BillingRouteDependencies {
    let store = Arc::new(InMemoryBillingStore::new());
    let service = Arc::new(BillingService::new(BillingServiceDependencies {
      customer_repo: store.clone(),
      item_repo: store.clone(),
      work_line_repo: store.clone(),
      invoice_repo: store.clone(),
      ledger: store,
    }));
    let mirror = Arc::new(StateMirror::new(service.clone()));
    let renderer = Arc::new(HtmlInvoiceRenderer::builtin("€").unwrap());
    BillingRouteDependencies::new(service, mirror, renderer)
  }

  macro_rules! app {
    () => {{
      let deps = deps();
      test::init_service(
        App::new().service(web::scope("/api/v1").configure(|cfg| configure_billing_routes(cfg, deps))),
      )
      .await
    }};
  }

  #[actix_web::test]
  async fn test_issue_print_and_reverse_flow() {
    let app = app!();

    let customer: Value = test::call_and_read_body_json(
      &app,
      test::TestRequest::post()
        .uri("/api/v1/customers")
        .set_json(json!({"name": "Bar Central", "tax_id": "B27000000", "city": "Lugo"}))
        .to_request(),
    )
    .await;
    let customer_id = customer["id"].as_str().unwrap().to_string();

    let item: Value = test::call_and_read_body_json(
      &app,
      test::TestRequest::post()
        .uri("/api/v1/items")
        .set_json(json!({"name": "Hora de oficial", "price": "10.00"}))
        .to_request(),
    )
    .await;
    let item_id = item["id"].as_str().unwrap().to_string();

    for (qty, price) in [("2", None), ("1", Some("5.50"))] {
      let resp = test::call_service(
        &app,
        test::TestRequest::post()
          .uri("/api/v1/work-lines")
          .set_json(json!({
            "customer_id": customer_id,
            "item_id": item_id,
            "qty": qty,
            "price": price,
            "work_date": "2025-04-02"
          }))
          .to_request(),
      )
      .await;
      assert_eq!(resp.status(), StatusCode::CREATED);
    }

    let pending: Value = test::call_and_read_body_json(
      &app,
      test::TestRequest::get()
        .uri(&format!("/api/v1/pending/{}", customer_id))
        .to_request(),
    )
    .await;
    assert_eq!(pending["lines"].as_array().unwrap().len(), 2);
    assert_eq!(pending["total"], "25.50");

    let issued: Value = test::call_and_read_body_json(
      &app,
      test::TestRequest::post()
        .uri("/api/v1/invoices")
        .set_json(json!({"customer_id": customer_id}))
        .to_request(),
    )
    .await;
    assert_eq!(issued["invoice"]["total"], "25.50");
    assert_eq!(issued["lines"].as_array().unwrap().len(), 2);
    let invoice_id = issued["invoice"]["id"].as_str().unwrap().to_string();

    // nothing left to bill
    let resp = test::call_service(
      &app,
      test::TestRequest::post()
        .uri("/api/v1/invoices")
        .set_json(json!({"customer_id": customer_id}))
        .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = test::call_service(
      &app,
      test::TestRequest::get()
        .uri(&format!("/api/v1/invoices/{}/print", invoice_id))
        .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert!(html.contains("Bar Central"));
    assert!(html.contains("Hora de oficial"));
    assert!(html.contains("€25.50"));

    let reversed: Value = test::call_and_read_body_json(
      &app,
      test::TestRequest::delete()
        .uri(&format!("/api/v1/invoices/{}", invoice_id))
        .to_request(),
    )
    .await;
    assert_eq!(reversed["released_lines"], 2);

    let lines: Value = test::call_and_read_body_json(
      &app,
      test::TestRequest::get()
        .uri(&format!("/api/v1/work-lines?customer_id={}", customer_id))
        .to_request(),
    )
    .await;
    assert_eq!(lines["pending_total"], "25.50");
    assert!(
      lines["lines"]
        .as_array()
        .unwrap()
        .iter()
        .all(|l| l["invoiced"] == false)
    );
  }

  #[actix_web::test]
  async fn test_error_statuses() {
    let app = app!();

    // no customer selected
    let resp = test::call_service(
      &app,
      test::TestRequest::post()
        .uri("/api/v1/work-lines")
        .set_json(json!({"work_date": "2025-04-02"}))
        .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = test::call_service(
      &app,
      test::TestRequest::post()
        .uri("/api/v1/customers")
        .set_json(json!({"name": ""}))
        .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = test::call_service(
      &app,
      test::TestRequest::delete()
        .uri(&format!("/api/v1/invoices/{}", uuid::Uuid::new_v4()))
        .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let customer: Value = test::call_and_read_body_json(
      &app,
      test::TestRequest::post()
        .uri("/api/v1/customers")
        .set_json(json!({"name": "Obras Lema"}))
        .to_request(),
    )
    .await;
    let item: Value = test::call_and_read_body_json(
      &app,
      test::TestRequest::post()
        .uri("/api/v1/items")
        .set_json(json!({"name": "Material"}))
        .to_request(),
    )
    .await;
    let resp = test::call_service(
      &app,
      test::TestRequest::post()
        .uri("/api/v1/work-lines")
        .set_json(json!({
          "customer_id": customer["id"],
          "item_id": item["id"],
          "qty": "0",
          "work_date": "2025-04-02"
        }))
        .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = test::call_service(
      &app,
      test::TestRequest::post()
        .uri("/api/v1/work-lines")
        .set_json(json!({
          "customer_id": customer["id"],
          "item_id": item["id"],
          "work_date": "2025-04-02"
        }))
        .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = test::call_service(
      &app,
      test::TestRequest::delete()
        .uri(&format!("/api/v1/customers/{}", customer["id"].as_str().unwrap()))
        .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
  }
}
