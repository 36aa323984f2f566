//! Worksheet names and column layouts.
//!
//! The spreadsheet has three worksheets with fixed headers. Column order here
//! is the order rows are appended in.

/// Products worksheet.
pub const PRODUCTS: &str = "Produtos";
/// Purchases worksheet.
pub const PURCHASES: &str = "Compras";
/// Sales worksheet.
pub const SALES: &str = "Vendas";

/// Column names shared by several worksheets.
pub mod columns {
    pub const ORDER_CODE: &str = "Pedido";
    pub const PRODUCT_ID: &str = "ID";
    pub const PRODUCT_NAME: &str = "Produto";
    pub const STANDARD_COST: &str = "Custo_Padrao";
    pub const SALE_PRICE: &str = "Preco_Venda";
    pub const IMAGE: &str = "Imagem";
    pub const DATE: &str = "Data";
    pub const ARRIVAL_DATE: &str = "Data_Chegada";
    pub const QUANTITY: &str = "Qtd";
    pub const UNIT_COST: &str = "Custo_Unit";
    pub const SUPPLIER: &str = "Fornecedor";
    pub const STATUS: &str = "Status";
    pub const NOTES: &str = "Observacoes";
    pub const COST: &str = "Custo";
    pub const LIST_PRICE: &str = "Preco_Tabela";
    pub const PROFIT: &str = "Lucro_Dif";
    pub const RECEIVED: &str = "Valor_Recebido";
    pub const MARGIN: &str = "Margem_Perc";
    pub const PLATFORM: &str = "Plataforma";
    pub const CONTACT: &str = "Ponto_de_Contato";
}

use columns::{
    ARRIVAL_DATE, CONTACT, COST, DATE, LIST_PRICE, MARGIN, NOTES, ORDER_CODE, PLATFORM, PROFIT,
    PRODUCT_ID, PRODUCT_NAME, QUANTITY, RECEIVED, SALE_PRICE, STANDARD_COST, STATUS, SUPPLIER,
    UNIT_COST,
};

/// `Produtos` columns.
pub const PRODUCT_COLUMNS: &[&str] = &[PRODUCT_ID, PRODUCT_NAME, STANDARD_COST, SALE_PRICE];

/// `Compras` columns.
pub const PURCHASE_COLUMNS: &[&str] = &[
    ORDER_CODE,
    DATE,
    ARRIVAL_DATE,
    PRODUCT_ID,
    PRODUCT_NAME,
    QUANTITY,
    UNIT_COST,
    SUPPLIER,
    STATUS,
    NOTES,
];

/// `Vendas` columns.
pub const SALE_COLUMNS: &[&str] = &[
    ORDER_CODE,
    PRODUCT_ID,
    PRODUCT_NAME,
    STATUS,
    COST,
    LIST_PRICE,
    PROFIT,
    RECEIVED,
    MARGIN,
    DATE,
    PLATFORM,
    CONTACT,
    NOTES,
];

/// Every worksheet with its columns, in bootstrap order.
pub const ALL_TABLES: &[(&str, &[&str])] = &[
    (PRODUCTS, PRODUCT_COLUMNS),
    (PURCHASES, PURCHASE_COLUMNS),
    (SALES, SALE_COLUMNS),
];

/// Look up the columns of a worksheet by name.
#[must_use]
pub fn columns_for(table: &str) -> Option<&'static [&'static str]> {
    ALL_TABLES
        .iter()
        .find(|(name, _)| *name == table)
        .map(|(_, columns)| *columns)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_columns_for_known_tables() {
        assert_eq!(columns_for(SALES).map(<[_]>::len), Some(13));
        assert_eq!(columns_for(PURCHASES).map(<[_]>::len), Some(10));
        assert_eq!(columns_for(PRODUCTS), Some(PRODUCT_COLUMNS));
        assert_eq!(columns_for("Clientes"), None);
    }

    #[test]
    fn test_order_code_leads_transaction_tables() {
        assert_eq!(PURCHASE_COLUMNS.first(), Some(&ORDER_CODE));
        assert_eq!(SALE_COLUMNS.first(), Some(&ORDER_CODE));
    }
}
