use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Supplier {
    pub id: i64,
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

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SupplierContact {
    pub id: i64,
    pub supplier_id: i64,
    pub name: String,
    pub position: String,
    pub email: String,
    pub phone: String,
    pub is_primary: bool,
}
