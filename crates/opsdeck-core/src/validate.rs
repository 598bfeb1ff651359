// Client-side form validation.
//
// Rules run synchronously before a mutation is dispatched; a submission
// with a non-empty error map never reaches the network. Uniqueness is
// NOT checked here -- the server owns it, and 409s surface unchanged.
// Successful validation yields the typed request body, so downstream
// code never re-parses form strings.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;

use opsdeck_api::types::{
    InventoryItemCreate, LineItemCreate, OrderCreate, PaymentStatus, PurchaseCreate,
    SupplierCreate, UserCreate,
};

/// Ceiling for supplier contact fields (contact name, email, phone).
const CONTACT_FIELD_MAX: usize = 120;

// ── Field-error map ─────────────────────────────────────────────────

/// Ordered map of form field name to error message. A form may be
/// submitted only when this is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    errors: BTreeMap<String, String>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.insert(field.into(), message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    /// Clearing policy: editing a field clears only that field's error;
    /// other fields are not re-validated until the next submit attempt.
    pub fn clear(&mut self, field: &str) {
        self.errors.remove(field);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.errors.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in &self.errors {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

// ── Rule helpers ────────────────────────────────────────────────────

fn require(errors: &mut FieldErrors, field: &str, label: &str, value: &str) -> bool {
    if value.trim().is_empty() {
        errors.insert(field, format!("{label} is required"));
        false
    } else {
        true
    }
}

/// Parse an optional price-like field, rejecting non-numeric strings.
/// Empty input defaults to zero (the field is optional on the form).
fn parse_amount(errors: &mut FieldErrors, field: &str, label: &str, raw: &str) -> f64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    match trimmed.parse::<f64>() {
        Ok(v) => v,
        Err(_) => {
            errors.insert(field, format!("{label} must be a number"));
            0.0
        }
    }
}

/// Parse an optional count-like field (quantity, reorder point).
fn parse_count(errors: &mut FieldErrors, field: &str, label: &str, raw: &str) -> u32 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0;
    }
    match trimmed.parse::<u32>() {
        Ok(v) => v,
        Err(_) => {
            errors.insert(field, format!("{label} must be a number"));
            0
        }
    }
}

fn check_len(errors: &mut FieldErrors, field: &str, label: &str, value: &str) {
    if value.chars().count() > CONTACT_FIELD_MAX {
        errors.insert(
            field,
            format!("{label} must be {CONTACT_FIELD_MAX} characters or fewer"),
        );
    }
}

/// Simple email shape check: one `@`, a non-empty local part, and a dot
/// somewhere in the domain. Deliverability is the server's problem.
fn email_looks_valid(value: &str) -> bool {
    let value = value.trim();
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !value.contains(char::is_whitespace)
        && !domain.contains('@')
}

fn check_email(errors: &mut FieldErrors, field: &str, value: &str) {
    if !value.trim().is_empty() && !email_looks_valid(value) {
        errors.insert(field, "Enter a valid email address");
    }
}

fn check_items(errors: &mut FieldErrors, items: &[LineItemCreate]) {
    if items.is_empty() {
        errors.insert("items", "Add at least one item");
    } else if items.iter().any(|line| line.quantity == 0) {
        errors.insert("items", "Item quantities must be at least 1");
    }
}

// ── Forms ───────────────────────────────────────────────────────────

/// Raw inventory form input. Numeric fields arrive as strings, exactly
/// as typed; validation turns them into the typed request body.
#[derive(Debug, Clone, Default)]
pub struct InventoryForm {
    pub name: String,
    pub sku: String,
    pub category: String,
    pub description: String,
    pub price: String,
    pub cost_price: String,
    pub quantity: String,
    pub reorder_point: String,
    pub location: String,
    pub supplier_id: i64,
    pub image_url: Option<String>,
}

pub fn inventory_form(form: &InventoryForm) -> Result<InventoryItemCreate, FieldErrors> {
    let mut errors = FieldErrors::new();

    require(&mut errors, "name", "Name", &form.name);
    require(&mut errors, "sku", "SKU", &form.sku);
    require(&mut errors, "category", "Category", &form.category);

    let price = parse_amount(&mut errors, "price", "Price", &form.price);
    let cost_price = parse_amount(&mut errors, "costPrice", "Cost price", &form.cost_price);
    let quantity = parse_count(&mut errors, "quantity", "Quantity", &form.quantity);
    let reorder_point = parse_count(
        &mut errors,
        "reorderPoint",
        "Reorder point",
        &form.reorder_point,
    );

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(InventoryItemCreate {
        name: form.name.clone(),
        sku: form.sku.clone(),
        category: form.category.clone(),
        description: form.description.clone(),
        price,
        cost_price,
        quantity,
        reorder_point,
        location: form.location.clone(),
        supplier_id: form.supplier_id,
        image_url: form.image_url.clone(),
    })
}

#[derive(Debug, Clone, Default)]
pub struct SupplierForm {
    pub name: String,
    pub contact_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub country: String,
    pub postal_code: String,
    pub is_active: bool,
}

pub fn supplier_form(form: &SupplierForm) -> Result<SupplierCreate, FieldErrors> {
    let mut errors = FieldErrors::new();

    require(&mut errors, "name", "Name", &form.name);
    require(&mut errors, "contactName", "Contact name", &form.contact_name);
    if require(&mut errors, "email", "Email", &form.email) {
        check_email(&mut errors, "email", &form.email);
    }

    check_len(&mut errors, "contactName", "Contact name", &form.contact_name);
    check_len(&mut errors, "email", "Email", &form.email);
    check_len(&mut errors, "phone", "Phone", &form.phone);

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(SupplierCreate {
        name: form.name.clone(),
        contact_name: form.contact_name.clone(),
        email: form.email.clone(),
        phone: form.phone.clone(),
        address: form.address.clone(),
        city: form.city.clone(),
        country: form.country.clone(),
        postal_code: form.postal_code.clone(),
        is_active: form.is_active,
    })
}

#[derive(Debug, Clone, Default)]
pub struct UserForm {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
}

pub fn user_form(form: &UserForm) -> Result<UserCreate, FieldErrors> {
    let mut errors = FieldErrors::new();

    if require(&mut errors, "email", "Email", &form.email) {
        check_email(&mut errors, "email", &form.email);
    }
    require(&mut errors, "password", "Password", &form.password);
    require(&mut errors, "firstName", "First name", &form.first_name);
    require(&mut errors, "lastName", "Last name", &form.last_name);
    require(&mut errors, "role", "Role", &form.role);

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(UserCreate {
        email: form.email.clone(),
        password: form.password.clone(),
        first_name: form.first_name.clone(),
        last_name: form.last_name.clone(),
        role: form.role.clone(),
    })
}

#[derive(Debug, Clone)]
pub struct OrderForm {
    pub customer: String,
    pub items: Vec<LineItemCreate>,
    pub payment_status: PaymentStatus,
}

pub fn order_form(form: &OrderForm) -> Result<OrderCreate, FieldErrors> {
    let mut errors = FieldErrors::new();

    require(&mut errors, "customer", "Customer", &form.customer);
    check_items(&mut errors, &form.items);

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(OrderCreate {
        customer: form.customer.clone(),
        items: form.items.clone(),
        payment_status: form.payment_status,
    })
}

#[derive(Debug, Clone)]
pub struct PurchaseForm {
    pub supplier_id: Option<i64>,
    pub expected_delivery_date: Option<NaiveDate>,
    pub items: Vec<LineItemCreate>,
    pub payment_status: PaymentStatus,
}

pub fn purchase_form(form: &PurchaseForm) -> Result<PurchaseCreate, FieldErrors> {
    let mut errors = FieldErrors::new();

    let Some(supplier_id) = form.supplier_id else {
        errors.insert("supplier", "Supplier is required");
        check_items(&mut errors, &form.items);
        return Err(errors);
    };
    check_items(&mut errors, &form.items);

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(PurchaseCreate {
        supplier_id,
        expected_delivery_date: form.expected_delivery_date,
        items: form.items.clone(),
        payment_status: form.payment_status,
    })
}

/// Date-range queries require `start <= end`; the store checks this
/// before calling the service.
pub fn date_range(start: NaiveDate, end: NaiveDate) -> Result<(), FieldErrors> {
    if start > end {
        let mut errors = FieldErrors::new();
        errors.insert("startDate", "Start date must be on or before end date");
        return Err(errors);
    }
    Ok(())
}
