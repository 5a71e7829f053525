//! View models shared by page templates.
//!
//! Templates only see display-ready strings; prices are converted into the
//! shopper's currency here.

use shop_core::blog::BlogPost;
use shop_core::catalog::ProductCard;
use shop_core::{Currency, Language, format_price};

use crate::content::image_url;
use crate::middleware::Preferences;

/// One entry of a language or currency switcher.
#[derive(Debug, Clone)]
pub struct ChoiceView {
    pub code: &'static str,
    pub label: String,
    pub selected: bool,
}

/// Layout data every page needs.
#[derive(Debug, Clone)]
pub struct PageContext {
    pub lang: &'static str,
    pub currency: Currency,
    pub language: Language,
    pub languages: Vec<ChoiceView>,
    pub currencies: Vec<ChoiceView>,
}

impl PageContext {
    #[must_use]
    pub fn new(prefs: Preferences) -> Self {
        let languages = Language::ALL
            .iter()
            .map(|&language| ChoiceView {
                code: language.code(),
                label: language.native_name().to_string(),
                selected: language == prefs.language,
            })
            .collect();
        let currencies = Currency::ALL
            .iter()
            .map(|&currency| ChoiceView {
                code: currency.code(),
                label: format!("{} {}", currency.symbol(), currency.code()),
                selected: currency == prefs.currency,
            })
            .collect();
        Self {
            lang: prefs.language.code(),
            currency: prefs.currency,
            language: prefs.language,
            languages,
            currencies,
        }
    }
}

/// Product card ready for the listing grid.
#[derive(Debug, Clone)]
pub struct ProductCardView {
    pub slug: String,
    pub title: String,
    pub price: String,
    pub compare_at_price: Option<String>,
    pub image: Option<String>,
    pub in_stock: bool,
    pub brand: Option<String>,
}

impl ProductCardView {
    #[must_use]
    pub fn new(card: ProductCard, currency: Currency) -> Self {
        let compare_at_price = card
            .is_on_sale()
            .then(|| card.compare_at_price.map(|p| format_price(p, currency)))
            .flatten();
        Self {
            price: format_price(card.price, currency),
            compare_at_price,
            image: card.image.as_deref().map(image_url).filter(|u| !u.is_empty()),
            in_stock: card.in_stock,
            brand: card.brand.map(|b| b.name),
            slug: card.slug,
            title: card.title,
        }
    }
}

/// Blog post card for listings.
#[derive(Debug, Clone)]
pub struct PostCardView {
    pub slug: String,
    pub title: String,
    pub date: String,
    pub excerpt: Option<String>,
    pub image: Option<String>,
}

impl PostCardView {
    #[must_use]
    pub fn new(post: &BlogPost, language: Language) -> Self {
        Self {
            slug: post.slug.clone(),
            title: post.title.clone(),
            date: post.display_date(language),
            excerpt: post.excerpt().map(str::to_owned),
            image: post
                .featured_image
                .as_deref()
                .map(image_url)
                .filter(|u| !u.is_empty()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;
    use shop_core::catalog::BrandRef;
    use shop_core::{BrandId, ProductId};

    use super::*;

    fn card(price: i64, compare_at: Option<i64>) -> ProductCard {
        ProductCard {
            id: ProductId::generate(),
            slug: "wool-scarf".to_owned(),
            title: "Wool scarf".to_owned(),
            price: Decimal::from(price),
            compare_at_price: compare_at.map(Decimal::from),
            image: Some("uploads/scarf.jpg".to_owned()),
            in_stock: true,
            brand: Some(BrandRef {
                id: BrandId::generate(),
                name: "Acme".to_owned(),
            }),
        }
    }

    #[test]
    fn test_card_prices_in_shopper_currency() {
        let view = ProductCardView::new(card(10, Some(15)), Currency::AMD);
        assert_eq!(view.price, "4,000 ֏");
        assert_eq!(view.compare_at_price.as_deref(), Some("6,000 ֏"));
        assert_eq!(view.image.as_deref(), Some("/uploads/scarf.jpg"));
        assert_eq!(view.brand.as_deref(), Some("Acme"));
    }

    #[test]
    fn test_compare_price_hidden_when_not_on_sale() {
        let view = ProductCardView::new(card(10, Some(8)), Currency::USD);
        assert_eq!(view.price, "$10.00");
        assert!(view.compare_at_price.is_none());
    }

    #[test]
    fn test_page_context_marks_selection() {
        let ctx = PageContext::new(Preferences {
            language: Language::Ru,
            currency: Currency::EUR,
        });
        assert_eq!(ctx.lang, "ru");
        let selected: Vec<_> = ctx.languages.iter().filter(|c| c.selected).collect();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].code, "ru");
        assert!(ctx.currencies.iter().any(|c| c.selected && c.code == "EUR"));
    }
}
