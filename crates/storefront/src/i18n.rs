//! Interface strings for the two storefront locales.
//!
//! Catalog text comes from the database; these are the fixed labels around it.

use souq_core::Locale;

/// Fixed UI labels for one locale.
#[derive(Debug)]
pub struct Messages {
    pub store_name: &'static str,
    pub products: &'static str,
    pub no_products: &'static str,
    pub add_to_cart: &'static str,
    pub sale: &'static str,
    pub features: &'static str,
    pub back_to_products: &'static str,
    pub cart: &'static str,
    pub cart_empty: &'static str,
    pub continue_shopping: &'static str,
    pub quantity: &'static str,
    pub update: &'static str,
    pub remove: &'static str,
    pub clear_cart: &'static str,
    pub total_items: &'static str,
    pub total: &'static str,
    pub payment_method: &'static str,
    pub checkout: &'static str,
    pub view_cart: &'static str,
    pub close: &'static str,
    /// Label of the link to the other locale.
    pub switch_language: &'static str,
}

const EN: Messages = Messages {
    store_name: "Souq",
    products: "Products",
    no_products: "No products available yet.",
    add_to_cart: "Add to cart",
    sale: "Sale",
    features: "Features",
    back_to_products: "Back to products",
    cart: "Shopping cart",
    cart_empty: "Your cart is empty.",
    continue_shopping: "Continue shopping",
    quantity: "Quantity",
    update: "Update",
    remove: "Remove",
    clear_cart: "Clear cart",
    total_items: "Total items",
    total: "Total",
    payment_method: "Payment method",
    checkout: "Order via WhatsApp",
    view_cart: "View cart",
    close: "Close",
    switch_language: "العربية",
};

const AR: Messages = Messages {
    store_name: "سوق",
    products: "المنتجات",
    no_products: "لا توجد منتجات بعد.",
    add_to_cart: "أضف إلى السلة",
    sale: "تخفيض",
    features: "المميزات",
    back_to_products: "العودة إلى المنتجات",
    cart: "سلة التسوق",
    cart_empty: "سلتك فارغة.",
    continue_shopping: "متابعة التسوق",
    quantity: "الكمية",
    update: "تحديث",
    remove: "إزالة",
    clear_cart: "إفراغ السلة",
    total_items: "إجمالي القطع",
    total: "الإجمالي",
    payment_method: "طريقة الدفع",
    checkout: "اطلب عبر واتساب",
    view_cart: "عرض السلة",
    close: "إغلاق",
    switch_language: "English",
};

/// Labels for `locale`.
#[must_use]
pub const fn messages(locale: Locale) -> &'static Messages {
    match locale {
        Locale::En => &EN,
        Locale::Ar => &AR,
    }
}

/// Page-level context shared by every template.
#[derive(Debug, Clone, Copy)]
pub struct PageContext {
    pub locale: Locale,
    pub t: &'static Messages,
}

impl PageContext {
    #[must_use]
    pub const fn new(locale: Locale) -> Self {
        Self {
            locale,
            t: messages(locale),
        }
    }

    /// Value for `<html lang>` and the URL prefix.
    #[must_use]
    pub const fn lang(&self) -> &'static str {
        self.locale.code()
    }

    /// Value for `<html dir>`.
    #[must_use]
    pub const fn dir(&self) -> &'static str {
        self.locale.direction().as_str()
    }

    /// The locale the language switcher links to.
    #[must_use]
    pub const fn other_lang(&self) -> &'static str {
        match self.locale {
            Locale::En => Locale::Ar.code(),
            Locale::Ar => Locale::En.code(),
        }
    }
}
