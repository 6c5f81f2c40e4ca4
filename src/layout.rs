//! Fixed column layout of the profit-margin template
//!
//! Every column of the data sheet is described by one [`Field`] variant, which
//! is the single source of its title, width, number format and row formula.
//! Formulas reference other columns through `Field` values, so the header,
//! width, format and formula maps cannot drift apart.

use crate::excel::cell_ref;
use serde::Serialize;

//==============================================================================
// Sheet and Row Constants
//==============================================================================

/// Name of the primary data sheet
pub const DATA_SHEET: &str = "商品利润率明细";

/// Name of the lookup sheet feeding the dropdowns
pub const LOOKUP_SHEET: &str = "字典";

/// Title of the store column on the lookup sheet (column A)
pub const STORE_LIST_TITLE: &str = "门店列表";

/// Title of the category column on the lookup sheet (column B)
pub const CATEGORY_LIST_TITLE: &str = "类别列表";

/// Fixed product categories offered in the category dropdown
pub const CATEGORIES: [&str; 4] = ["主食", "小吃", "饮品", "其他"];

/// First data row (1-based, Excel numbering)
pub const FIRST_DATA_ROW: u32 = 2;

/// Last data row (1-based, inclusive)
pub const LAST_DATA_ROW: u32 = 1001;

/// Number of pre-formatted data rows
pub const DATA_ROW_COUNT: u32 = LAST_DATA_ROW - FIRST_DATA_ROW + 1;

pub const DATE_FORMAT: &str = "yyyy-mm-dd";
pub const CURRENCY_FORMAT: &str = "\"¥\"#,##0.00";
pub const PERCENT_FORMAT: &str = "0.00%";

//==============================================================================
// Number Formats
//==============================================================================

/// Display format applied to a column's data cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NumberFormat {
    Date,
    /// Yuan symbol, thousands separator, 2 decimals
    Currency,
    /// Percentage with 2 decimals
    Percent,
    None,
}

impl NumberFormat {
    /// Excel format code, or `None` for unformatted columns
    pub fn code(&self) -> Option<&'static str> {
        match self {
            NumberFormat::Date => Some(DATE_FORMAT),
            NumberFormat::Currency => Some(CURRENCY_FORMAT),
            NumberFormat::Percent => Some(PERCENT_FORMAT),
            NumberFormat::None => None,
        }
    }
}

//==============================================================================
// Columns
//==============================================================================

/// One column of the data sheet, in left-to-right order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Date,
    Store,
    ProductName,
    Sku,
    Category,
    Supplier,
    PurchasePrice,
    CostTaxRate,
    LogisticsAndLoss,
    TotalCost,
    SuggestedPrice,
    ActualPrice,
    Discount,
    PlatformCommissionRate,
    PlatformCommission,
    PaymentFeeRate,
    PaymentFee,
    PackagingFee,
    DeliveryFee,
    OperatingAllocation,
    OutputTaxRate,
    Tax,
    GrossProfit,
    GrossMargin,
    NetProfit,
    NetMargin,
    Remarks,
}

impl Field {
    /// All columns in sheet order
    pub const ALL: [Field; 27] = [
        Field::Date,
        Field::Store,
        Field::ProductName,
        Field::Sku,
        Field::Category,
        Field::Supplier,
        Field::PurchasePrice,
        Field::CostTaxRate,
        Field::LogisticsAndLoss,
        Field::TotalCost,
        Field::SuggestedPrice,
        Field::ActualPrice,
        Field::Discount,
        Field::PlatformCommissionRate,
        Field::PlatformCommission,
        Field::PaymentFeeRate,
        Field::PaymentFee,
        Field::PackagingFee,
        Field::DeliveryFee,
        Field::OperatingAllocation,
        Field::OutputTaxRate,
        Field::Tax,
        Field::GrossProfit,
        Field::GrossMargin,
        Field::NetProfit,
        Field::NetMargin,
        Field::Remarks,
    ];

    /// Zero-based column index on the data sheet
    pub fn index(self) -> u16 {
        self as u16
    }

    /// Column letter (A, B, ..., AA)
    pub fn letter(self) -> String {
        cell_ref::column_index_to_letter(self.index() as usize)
    }

    /// Header title
    pub fn title(self) -> &'static str {
        match self {
            Field::Date => "日期",
            Field::Store => "门店",
            Field::ProductName => "商品名称",
            Field::Sku => "SKU",
            Field::Category => "类别",
            Field::Supplier => "供应商",
            Field::PurchasePrice => "进货价",
            Field::CostTaxRate => "成本税率",
            Field::LogisticsAndLoss => "运/包/损",
            Field::TotalCost => "总成本",
            Field::SuggestedPrice => "建议售价",
            Field::ActualPrice => "实际售价",
            Field::Discount => "折扣金额",
            Field::PlatformCommissionRate => "平台佣金率",
            Field::PlatformCommission => "平台佣金",
            Field::PaymentFeeRate => "支付手续费率",
            Field::PaymentFee => "支付手续费",
            Field::PackagingFee => "包装费",
            Field::DeliveryFee => "配送费",
            Field::OperatingAllocation => "运营分摊",
            Field::OutputTaxRate => "销项税率",
            Field::Tax => "税金",
            Field::GrossProfit => "毛利",
            Field::GrossMargin => "毛利率",
            Field::NetProfit => "净利",
            Field::NetMargin => "净利率",
            Field::Remarks => "备注",
        }
    }

    /// Column width in character units
    pub fn width(self) -> f64 {
        match self {
            Field::ProductName | Field::Remarks => 20.0,
            Field::Store | Field::Supplier => 16.0,
            Field::PaymentFeeRate | Field::PaymentFee => 14.0,
            Field::PackagingFee | Field::DeliveryFee | Field::GrossMargin | Field::NetMargin => {
                10.0
            }
            _ => 12.0,
        }
    }

    pub fn number_format(self) -> NumberFormat {
        match self {
            Field::Date => NumberFormat::Date,
            Field::PurchasePrice
            | Field::LogisticsAndLoss
            | Field::TotalCost
            | Field::SuggestedPrice
            | Field::ActualPrice
            | Field::Discount
            | Field::PlatformCommission
            | Field::PaymentFee
            | Field::PackagingFee
            | Field::DeliveryFee
            | Field::OperatingAllocation
            | Field::Tax
            | Field::GrossProfit
            | Field::NetProfit => NumberFormat::Currency,
            Field::CostTaxRate
            | Field::PlatformCommissionRate
            | Field::PaymentFeeRate
            | Field::OutputTaxRate
            | Field::GrossMargin
            | Field::NetMargin => NumberFormat::Percent,
            _ => NumberFormat::None,
        }
    }

    /// Whether the column holds a derived value computed by a formula
    pub fn is_derived(self) -> bool {
        self.formula(FIRST_DATA_ROW).is_some()
    }

    /// Excel formula for this column on the given 1-based row
    ///
    /// Only same-row cells are referenced. The margin ratios are wrapped in
    /// `IFERROR(...,"")` so a zero net revenue leaves the cell blank.
    pub fn formula(self, row: u32) -> Option<String> {
        let at = |field: Field| format!("{}{}", field.letter(), row);
        let net_revenue = format!("({}-{})", at(Field::ActualPrice), at(Field::Discount));

        let formula = match self {
            Field::TotalCost => format!(
                "={}*(1+{})+{}",
                at(Field::PurchasePrice),
                at(Field::CostTaxRate),
                at(Field::LogisticsAndLoss)
            ),
            Field::PlatformCommission => {
                format!("={}*{}", net_revenue, at(Field::PlatformCommissionRate))
            }
            Field::PaymentFee => format!("={}*{}", net_revenue, at(Field::PaymentFeeRate)),
            Field::Tax => format!("={}*{}", net_revenue, at(Field::OutputTaxRate)),
            Field::GrossProfit => format!(
                "={}-{}-{}-{}-{}-{}-{}",
                net_revenue,
                at(Field::PlatformCommission),
                at(Field::PaymentFee),
                at(Field::PackagingFee),
                at(Field::DeliveryFee),
                at(Field::OperatingAllocation),
                at(Field::TotalCost)
            ),
            Field::GrossMargin => guarded_ratio(&at(Field::GrossProfit), &net_revenue),
            Field::NetProfit => format!("={}-{}", at(Field::GrossProfit), at(Field::Tax)),
            Field::NetMargin => guarded_ratio(&at(Field::NetProfit), &net_revenue),
            _ => return None,
        };

        Some(formula)
    }
}

/// `numerator / denominator`, blank instead of a division error
fn guarded_ratio(numerator: &str, denominator: &str) -> String {
    format!("=IFERROR({}/{},\"\")", numerator, denominator)
}

/// Header titles in sheet order
pub fn headers() -> Vec<&'static str> {
    Field::ALL.iter().map(|f| f.title()).collect()
}

/// Columns that receive a formula on every data row
pub fn derived_fields() -> Vec<Field> {
    Field::ALL.into_iter().filter(|f| f.is_derived()).collect()
}
