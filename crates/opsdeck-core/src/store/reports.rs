// Sales report store.
//
// Reports are server-derived and displayed as-is; the store holds only
// the most recently fetched report plus loading/error metadata. The
// date-range precondition (`start <= end`) is checked here, before the
// service is called.

use std::sync::Arc;

use chrono::NaiveDate;
use tokio::sync::watch;

use opsdeck_api::BackofficeClient;

use crate::error::CoreError;
use crate::model::{DailySales, PaymentMethodSales, SalesReport};
use crate::validate;

pub struct ReportStore {
    client: Arc<BackofficeClient>,
    latest: watch::Sender<Option<Arc<SalesReport>>>,
    loading: watch::Sender<bool>,
    error: watch::Sender<Option<CoreError>>,
}

impl ReportStore {
    pub fn new(client: Arc<BackofficeClient>) -> Self {
        let (latest, _) = watch::channel(None);
        let (loading, _) = watch::channel(false);
        let (error, _) = watch::channel(None);
        Self {
            client,
            latest,
            loading,
            error,
        }
    }

    /// Fetch the sales report for a date range and retain it as the
    /// latest report. A failed fetch keeps the previous report.
    pub async fn fetch_report(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Arc<SalesReport>, CoreError> {
        validate::date_range(start, end)?;

        let _ = self.loading.send(true);
        let outcome = match self.client.sales_report(start, end).await {
            Ok(report) => {
                let report = Arc::new(report);
                let _ = self.latest.send(Some(Arc::clone(&report)));
                let _ = self.error.send(None);
                Ok(report)
            }
            Err(e) => {
                let err = CoreError::from(e);
                let _ = self.error.send(Some(err.clone()));
                Err(err)
            }
        };
        let _ = self.loading.send(false);
        outcome
    }

    /// Daily sales buckets over a date range (not retained).
    pub async fn daily_sales(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailySales>, CoreError> {
        validate::date_range(start, end)?;
        self.client
            .sales_by_day(start, end)
            .await
            .map_err(CoreError::from)
    }

    /// Payment-method breakdown over a date range (not retained).
    pub async fn payment_method_sales(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PaymentMethodSales>, CoreError> {
        validate::date_range(start, end)?;
        self.client
            .sales_by_payment_method(start, end)
            .await
            .map_err(CoreError::from)
    }

    // ── Reads ───────────────────────────────────────────────────────

    pub fn latest(&self) -> Option<Arc<SalesReport>> {
        self.latest.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<SalesReport>>> {
        self.latest.subscribe()
    }

    pub fn is_loading(&self) -> bool {
        *self.loading.borrow()
    }

    pub fn watch_loading(&self) -> watch::Receiver<bool> {
        self.loading.subscribe()
    }

    pub fn last_error(&self) -> Option<CoreError> {
        self.error.borrow().clone()
    }

    pub fn watch_error(&self) -> watch::Receiver<Option<CoreError>> {
        self.error.subscribe()
    }
}
