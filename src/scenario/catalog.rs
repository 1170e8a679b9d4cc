use crate::scenario::account;
use crate::scenario::content;
use crate::scenario::scenario_model::{Expectation, Scenario};
use crate::scenario::storefront;

/// Every scenario, in run order.
pub static CATALOG: &[Scenario] = &[
    Scenario {
        name: "homepage_loads",
        description: "Home page has a title and featured products",
        expectation: Expectation::Pass,
        run: storefront::homepage_loads,
    },
    Scenario {
        name: "add_to_cart",
        description: "Add HTC Touch HD to the cart from the home page",
        expectation: Expectation::Pass,
        run: storefront::add_to_cart,
    },
    Scenario {
        name: "register_new_user",
        description: "Register an account with a fresh e-mail",
        expectation: Expectation::Pass,
        run: account::register_new_user,
    },
    Scenario {
        name: "register_existing_email",
        description: "Registering a known e-mail shows an 'already registered' alert",
        expectation: Expectation::Pass,
        run: account::register_existing_email,
    },
    Scenario {
        name: "forgotten_password_registered",
        description: "Password reset for a registered e-mail is confirmed",
        expectation: Expectation::Pass,
        run: account::forgotten_password_registered,
    },
    Scenario {
        name: "forgotten_password_unregistered",
        description: "Password reset for an unknown e-mail answers neutrally",
        expectation: Expectation::Pass,
        run: account::forgotten_password_unregistered,
    },
    Scenario {
        name: "newsletter_toggle",
        description: "Newsletter Yes and No choices persist",
        expectation: Expectation::Pass,
        run: account::newsletter_toggle,
    },
    Scenario {
        name: "contact_form",
        description: "Contact enquiry reaches the success page",
        expectation: Expectation::Pass,
        run: content::contact_form,
    },
    Scenario {
        name: "blog_comment",
        description: "Blog comment shows the thank-you banner",
        expectation: Expectation::Pass,
        run: content::blog_comment,
    },
    Scenario {
        name: "product_compare",
        description: "Compare two products, then remove one",
        expectation: Expectation::Pass,
        run: storefront::product_compare,
    },
    Scenario {
        name: "search_nikon",
        description: "Every Nikon search result page mentions Nikon",
        expectation: Expectation::Pass,
        run: storefront::search_nikon,
    },
    Scenario {
        name: "megamenu_asus_breadcrumbs",
        description: "Asus laptops from the mega menu carry Laptops and Asus breadcrumbs",
        expectation: Expectation::Pass,
        run: storefront::megamenu_asus_breadcrumbs,
    },
    Scenario {
        name: "category_navigation",
        description: "Shop by Category links land where they should",
        expectation: Expectation::Pass,
        run: storefront::category_navigation,
    },
    Scenario {
        name: "promo_link_current_defect",
        description: "Washing machine promotion currently returns to the home page",
        expectation: Expectation::Pass,
        run: storefront::promo_link_current_defect,
    },
    Scenario {
        name: "promo_link_after_fix",
        description: "Washing machine promotion opens a category or product",
        expectation: Expectation::KnownDefect {
            reason: "promotion SHOP NOW link returns to the home page",
        },
        run: storefront::promo_link_after_fix,
    },
    Scenario {
        name: "invalid_address_rejected",
        description: "Address form rejects junk data",
        expectation: Expectation::KnownDefect {
            reason: "address form saves values without validation",
        },
        run: account::invalid_address_rejected,
    },
    Scenario {
        name: "review_submission",
        description: "Logged-in user submits a product review",
        expectation: Expectation::Pass,
        run: account::review_submission,
    },
    Scenario {
        name: "review_too_short",
        description: "Too-short review text is rejected",
        expectation: Expectation::Pass,
        run: account::review_too_short,
    },
];

pub fn find(name: &str) -> Option<&'static Scenario> {
    CATALOG.iter().find(|s| s.name == name)
}
