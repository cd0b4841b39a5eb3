use shared::domain::Plan;

use crate::router::Route;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanOffer {
    pub plan: Plan,
    pub title: &'static str,
    pub tagline: &'static str,
    pub monthly_price_usd: u32,
    pub features: &'static [&'static str],
    pub call_to_action: &'static str,
    pub popular: bool,
}

impl PlanOffer {
    pub fn route(&self) -> Route {
        Route::Register { plan: self.plan }
    }

    pub fn price_label(&self) -> String {
        format!("${} / month", self.monthly_price_usd)
    }
}

pub const HEADLINE: &str = "Simple, transparent pricing";
pub const SUBHEADLINE: &str =
    "Choose the plan that's right for you and start chatting with your PDF documents today.";

pub static OFFERS: [PlanOffer; 2] = [
    PlanOffer {
        plan: Plan::Free,
        title: "Free",
        tagline: "Perfect for getting started with PDF chat",
        monthly_price_usd: 0,
        features: &[
            "Upload up to 3 PDF documents",
            "Maximum 5 pages per PDF",
            "Basic chat functionality",
            "Standard response time",
        ],
        call_to_action: "Get Started",
        popular: false,
    },
    PlanOffer {
        plan: Plan::Pro,
        title: "Pro",
        tagline: "For professionals who need advanced features",
        monthly_price_usd: 15,
        features: &[
            "Unlimited PDF uploads",
            "Maximum 50 pages per PDF",
            "Advanced AI chat capabilities",
            "Priority response time",
        ],
        call_to_action: "Upgrade to Pro",
        popular: true,
    },
];

pub fn offer(plan: Plan) -> &'static PlanOffer {
    match plan {
        Plan::Free => &OFFERS[0],
        Plan::Pro => &OFFERS[1],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pro_offer_routes_to_registration_with_plan() {
        let pro = offer(Plan::Pro);
        assert!(pro.popular);
        assert_eq!(pro.price_label(), "$15 / month");
        assert_eq!(pro.route().to_string(), "/register?plan=pro");
        assert_eq!(offer(Plan::Free).route().to_string(), "/register");
    }
}
