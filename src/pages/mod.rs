//! Page objects for the storefront.
//!
//! Each page borrows a [`PageSession`](crate::browser::session::PageSession)
//! and declares its elements as `const` [`Target`](crate::locator::locator_model::Target)s.

pub mod address_page;
pub mod blog_page;
pub mod compare_page;
pub mod contact_page;
pub mod forgotten_password_page;
pub mod home_page;
pub mod listing_page;
pub mod login_page;
pub mod newsletter_page;
pub mod product_page;
pub mod register_page;

/// Site routes, relative to the base URL.
pub mod routes {
    pub const HOME: &str = "index.php?route=common/home";
    pub const REGISTER: &str = "index.php?route=account/register";
    pub const LOGIN: &str = "index.php?route=account/login";
    /// Fragment of the account dashboard URL reached after logging in.
    pub const ACCOUNT_DASHBOARD: &str = "route=account/account";
    pub const FORGOTTEN: &str = "index.php?route=account/forgotten";
    pub const NEWSLETTER: &str = "index.php?route=account/newsletter";
    pub const ADDRESS_ADD: &str = "index.php?route=account/address/add";
    pub const CONTACT: &str = "index.php?route=information/contact";
    pub const COMPARE: &str = "index.php?route=product/compare";
    pub const SEARCH_ALL: &str = "index.php?route=product/search&search=";

    pub fn product(product_id: u32) -> String {
        format!("index.php?route=product/product&product_id={}", product_id)
    }

    pub fn blog_article(article_id: u32) -> String {
        format!(
            "index.php?route=extension/maza/blog/article&article_id={}",
            article_id
        )
    }
}

/// Collect `href`s of the given elements, skipping blanks and duplicates.
pub(crate) fn push_unique_hrefs(
    driver: &mut dyn crate::browser::driver::Driver,
    elements: &[crate::browser::driver::ElementRef],
    into: &mut Vec<String>,
) {
    for el in elements {
        if let Ok(Some(href)) = driver.attribute(el, "href") {
            let href = href.trim().to_string();
            if !href.is_empty() && !into.contains(&href) {
                into.push(href);
            }
        }
    }
}
