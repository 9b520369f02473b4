use crate::features::subscriptions::{has_lite_plan, Subscription};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuIcon {
    Dashboard,
    Target,
    HandCoins,
    BanknoteDown,
    CreditCard,
    ArrowLeftRight,
    FileText,
    User,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MenuEntry {
    pub href: &'static str,
    pub label: &'static str,
    pub active: bool,
    pub icon: MenuIcon,
    pub requires_premium: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MenuGroup {
    pub label: &'static str,
    pub menus: Vec<MenuEntry>,
}

fn entry(pathname: &str, href: &'static str, label: &'static str, icon: MenuIcon) -> MenuEntry {
    MenuEntry {
        href,
        label,
        active: pathname.starts_with(href),
        icon,
        requires_premium: false,
    }
}

pub fn menu_list(pathname: &str, subscription: Option<&Subscription>) -> Vec<MenuGroup> {
    let mut menus = vec![
        MenuEntry {
            href: "/management",
            label: "Dashboard",
            active: pathname == "/management",
            icon: MenuIcon::Dashboard,
            requires_premium: false,
        },
        entry(pathname, "/management/goals", "Metas", MenuIcon::Target),
        entry(pathname, "/management/budgets", "Presupuestos", MenuIcon::HandCoins),
        entry(pathname, "/management/debts", "Deudas", MenuIcon::BanknoteDown),
        entry(pathname, "/management/payment-methods", "Métodos de Pago", MenuIcon::CreditCard),
        entry(pathname, "/management/transactions", "Transacciones", MenuIcon::ArrowLeftRight),
        MenuEntry {
            requires_premium: true,
            ..entry(pathname, "/management/reports/create", "Reportes", MenuIcon::FileText)
        },
        entry(pathname, "/management/profile", "Mi Perfil", MenuIcon::User),
    ];

    if has_lite_plan(subscription) {
        menus.retain(|menu| !menu.requires_premium);
    }

    vec![MenuGroup {
        label: "Módulos",
        menus,
    }]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn subscription(plan: &str) -> Subscription {
        serde_json::from_value(json!({"plan": {"name": plan}, "active": true})).unwrap()
    }

    fn labels(groups: &[MenuGroup]) -> Vec<&'static str> {
        groups.iter().flat_map(|g| g.menus.iter().map(|m| m.label)).collect()
    }

    #[test]
    fn lite_plan_hides_reports() {
        let groups = menu_list("/management", Some(&subscription("Plan Lite")));
        assert_eq!(groups.len(), 1);
        assert!(!labels(&groups).contains(&"Reportes"));
        assert_eq!(groups[0].menus.len(), 7);
    }

    #[test]
    fn other_plans_keep_reports() {
        for plan in ["Plus", "Demo", "Premium"] {
            assert!(labels(&menu_list("/management", Some(&subscription(plan)))).contains(&"Reportes"));
        }
        assert!(labels(&menu_list("/management", None)).contains(&"Reportes"));
    }

    #[test]
    fn dashboard_is_active_only_on_exact_path() {
        let groups = menu_list("/management/goals/create", None);
        let active: Vec<_> = groups[0].menus.iter().filter(|m| m.active).map(|m| m.label).collect();
        assert_eq!(active, vec!["Metas"]);

        let groups = menu_list("/management", None);
        let active: Vec<_> = groups[0].menus.iter().filter(|m| m.active).map(|m| m.label).collect();
        assert_eq!(active, vec!["Dashboard"]);
        assert_eq!(groups[0].label, "Módulos");
    }
}
