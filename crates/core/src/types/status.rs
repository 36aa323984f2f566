//! Status and channel enums for purchases and sales.
//!
//! Values are stored in the sheet as their Portuguese labels. Labels typed by
//! hand that don't match a known variant are kept verbatim in `Other` so a
//! read never fails on them.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Generates label conversions for a sheet-backed enum.
macro_rules! sheet_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => $label:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(into = "String", from = "String")]
        pub enum $name {
            $($variant,)+
            /// A label not known to this version.
            Other(String),
        }

        impl $name {
            /// Known variants, in the order forms list them.
            pub const KNOWN: &'static [Self] = &[$(Self::$variant),+];

            /// The label written to the sheet.
            #[must_use]
            pub fn label(&self) -> &str {
                match self {
                    $(Self::$variant => $label,)+
                    Self::Other(label) => label,
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl FromStr for $name {
            type Err = core::convert::Infallible;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let trimmed = s.trim();
                Ok(Self::KNOWN
                    .iter()
                    .find(|known| known.label().eq_ignore_ascii_case(trimmed))
                    .cloned()
                    .unwrap_or_else(|| Self::Other(trimmed.to_string())))
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                match s.parse() {
                    Ok(value) => value,
                    Err(never) => match never {},
                }
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.label().to_string()
            }
        }
    };
}

sheet_enum! {
    /// Purchase order lifecycle.
    PurchaseStatus {
        Ordered => "Pedido Feito",
        InTransit => "Em Trânsito",
        Received => "Recebido",
        Cancelled => "Cancelado",
    }
}

sheet_enum! {
    /// Sale lifecycle.
    SaleStatus {
        Reserved => "Reservado",
        Paid => "Pago",
        Delivered => "Entregue",
        Cancelled => "Cancelado",
    }
}

sheet_enum! {
    /// Channel a sale came through.
    Platform {
        Instagram => "Instagram",
        WhatsApp => "WhatsApp",
        MercadoLivre => "Mercado Livre",
        Site => "Site",
        InPerson => "Presencial",
        Unspecified => "Outro",
    }
}

impl PurchaseStatus {
    /// Stock for this purchase is physically in hand.
    #[must_use]
    pub const fn is_received(&self) -> bool {
        matches!(self, Self::Received)
    }

    /// Stock for this purchase is still on its way.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Ordered | Self::InTransit)
    }

    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

impl SaleStatus {
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_round_trip_through_sheet_text() {
        for status in PurchaseStatus::KNOWN {
            let parsed: PurchaseStatus = status.label().parse().unwrap();
            assert_eq!(&parsed, status);
        }
    }

    #[test]
    fn test_parse_is_case_insensitive_and_trimmed() {
        let status: SaleStatus = "  pago ".parse().unwrap();
        assert_eq!(status, SaleStatus::Paid);
    }

    #[test]
    fn test_unknown_label_is_preserved() {
        let platform: Platform = "Shopee".parse().unwrap();
        assert_eq!(platform, Platform::Other("Shopee".to_string()));
        assert_eq!(platform.to_string(), "Shopee");
    }

    #[test]
    fn test_serde_uses_labels() {
        let json = serde_json::to_string(&Platform::MercadoLivre).unwrap();
        assert_eq!(json, "\"Mercado Livre\"");
        let parsed: SaleStatus = serde_json::from_str("\"Cancelado\"").unwrap();
        assert!(parsed.is_cancelled());
    }

    #[test]
    fn test_purchase_status_predicates() {
        assert!(PurchaseStatus::Received.is_received());
        assert!(PurchaseStatus::InTransit.is_pending());
        assert!(!PurchaseStatus::Cancelled.is_pending());
    }
}
