// Sales reporting endpoints.
//
// Date-range parameters go over the wire as `YYYY-MM-DD` query strings.
// Range ordering is not validated here -- the caller is expected to have
// checked it, and a server rejection surfaces as a typed error.

use chrono::NaiveDate;

use crate::client::BackofficeClient;
use crate::error::Error;
use crate::types::{DailySalesDto, PaymentMethodSalesDto, SalesReportDto};

fn range_params(start: NaiveDate, end: NaiveDate) -> [(&'static str, String); 2] {
    [
        ("startDate", start.to_string()),
        ("endDate", end.to_string()),
    ]
}

impl BackofficeClient {
    /// Full sales report over a date range, aggregated server-side.
    pub async fn sales_report(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<SalesReportDto, Error> {
        self.get_with_params("api/reports/sales", &range_params(start, end))
            .await
    }

    /// Daily sales totals over a date range.
    pub async fn sales_by_day(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailySalesDto>, Error> {
        self.get_with_params("api/reports/sales/daily", &range_params(start, end))
            .await
    }

    /// Sales totals broken down by payment method over a date range.
    pub async fn sales_by_payment_method(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PaymentMethodSalesDto>, Error> {
        self.get_with_params(
            "api/reports/sales/payment-methods",
            &range_params(start, end),
        )
        .await
    }
}
