//! WhatsApp click-to-chat links for catalog products.

use crate::types::currency::format_decimal_br;

const WA_BASE: &str = "https://wa.me/";

/// Build the chat link a customer follows to ask about a product.
///
/// Only the digits of `number` are kept, so `+55 (11) 99999-0000` works.
///
/// # Example
///
/// ```
/// use zeidan_core::whatsapp::order_link;
///
/// let link = order_link("+55 11 99999-0000", "Sauvage", "650,00");
/// assert!(link.starts_with("https://wa.me/5511999990000?text=Ol%C3%A1%21"));
/// ```
#[must_use]
pub fn order_link(number: &str, product_name: &str, price_text: &str) -> String {
    let digits: String = number.chars().filter(char::is_ascii_digit).collect();
    let message =
        format!("Olá! Vi o perfume *{product_name}* no site por R$ {price_text} e tenho interesse.");
    format!("{WA_BASE}{digits}?text={}", urlencoding::encode(&message))
}

/// [`order_link`] with the price formatted from an amount.
#[must_use]
pub fn order_link_for_price(number: &str, product_name: &str, price: f64) -> String {
    order_link(number, product_name, &format_decimal_br(price))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_is_fully_encoded() {
        let link = order_link("5511999990000", "Club de Nuit", "350,00");
        assert_eq!(
            link,
            "https://wa.me/5511999990000?text=Ol%C3%A1%21%20Vi%20o%20perfume%20%2AClub%20de%20Nuit%2A%20no%20site%20por%20R%24%20350%2C00%20e%20tenho%20interesse."
        );
    }

    #[test]
    fn test_number_reduced_to_digits() {
        let link = order_link("+55 (11) 98888-7777", "X", "1,00");
        assert!(link.starts_with("https://wa.me/5511988887777?text="));
    }

    #[test]
    fn test_price_formatting() {
        let link = order_link_for_price("1", "Y", 1234.5);
        assert!(link.contains("R%24%201.234%2C50"));
    }
}
