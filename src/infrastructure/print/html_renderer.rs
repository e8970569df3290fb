use std::sync::Arc;
use tera::{Context, Tera};

use crate::domain::billing::{BillingError, InvoiceRenderer, PrintableInvoice};

const TEMPLATE_NAME: &str = "invoice_print.html.tera";
const BUILTIN_TEMPLATE: &str = include_str!("../../../templates/invoice_print.html.tera");

/// Renders printable invoices to a self-contained HTML page that opens the
/// browser's print dialog on load.
#[derive(Clone)]
pub struct HtmlInvoiceRenderer {
  tera: Arc<Tera>,
  currency_symbol: String,
}

impl HtmlInvoiceRenderer {
  /// Loads `*.html.tera` templates from `template_dir`, falling back to the
  /// bundled print template when the directory does not provide one.
  pub fn new(template_dir: &str, currency_symbol: impl Into<String>) -> Result<Self, tera::Error> {
    let mut tera = Tera::new(&format!("{}/**/*.html.tera", template_dir))?;
    if !tera.get_template_names().any(|name| name == TEMPLATE_NAME) {
      tracing::warn!(
        "No {} under {}, using the bundled template",
        TEMPLATE_NAME,
        template_dir
      );
      tera.add_raw_template(TEMPLATE_NAME, BUILTIN_TEMPLATE)?;
    }
    tera.autoescape_on(vec![".html.tera", ".html"]);

    Ok(Self {
      tera: Arc::new(tera),
      currency_symbol: currency_symbol.into(),
    })
  }

  /// Renderer backed only by the bundled template.
  pub fn builtin(currency_symbol: impl Into<String>) -> Result<Self, tera::Error> {
    let mut tera = Tera::default();
    tera.add_raw_template(TEMPLATE_NAME, BUILTIN_TEMPLATE)?;
    tera.autoescape_on(vec![".html.tera", ".html"]);

    Ok(Self {
      tera: Arc::new(tera),
      currency_symbol: currency_symbol.into(),
    })
  }
}

impl InvoiceRenderer for HtmlInvoiceRenderer {
  fn render(&self, invoice: &PrintableInvoice) -> Result<String, BillingError> {
    let mut context = Context::new();
    context.insert("invoice", invoice);
    context.insert("currency", &self.currency_symbol);

    self.tera.render(TEMPLATE_NAME, &context).map_err(|e| {
      tracing::error!("Failed to render invoice {}: {:?}", invoice.number, e);
      BillingError::Render(e.to_string())
    })
  }
}
