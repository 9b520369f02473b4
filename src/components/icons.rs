use yew::prelude::*;

use crate::menu::MenuIcon;

fn icon_base(path: &'static str) -> Html {
    html! {
        <svg width="20" height="20" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round">
            <path d={path}></path>
        </svg>
    }
}

pub fn icon_bell() -> Html {
    icon_base("M18 8a6 6 0 10-12 0c0 7-3 7-3 7h18s-3 0-3-7M13.7 21a2 2 0 01-3.4 0")
}
pub fn icon_layout_grid() -> Html {
    icon_base("M3 3h8v8H3zM13 3h8v8h-8zM3 13h8v8H3zM13 13h8v8h-8z")
}
pub fn icon_wallet() -> Html {
    icon_base("M3 7h18v10H3zM16 7V5H5v2")
}
pub fn icon_trending_up() -> Html {
    icon_base("M3 17l6-6 4 4 7-7")
}
pub fn icon_credit_card() -> Html {
    icon_base("M3 7h18v10H3zM3 11h18")
}
pub fn icon_target() -> Html {
    icon_base("M12 12m-9 0a9 9 0 1018 0 9 9 0 10-18 0M12 12m-4 0a4 4 0 108 0 4 4 0 10-8 0")
}
pub fn icon_hand_coins() -> Html {
    icon_base("M11 15h2a2 2 0 100-4h-3c-.6 0-1.1.2-1.4.6L3 17M7 21l1.6-1.4c.3-.4.8-.6 1.4-.6h4c1.1 0 2.1-.4 2.8-1.2l4.6-4.4a2 2 0 00-2.8-2.9l-4.2 3.9")
}
pub fn icon_banknote_down() -> Html {
    icon_base("M12 18H4a2 2 0 01-2-2V8a2 2 0 012-2h16a2 2 0 012 2v5M16 19l3 3 3-3M19 16v6")
}
pub fn icon_arrow_left_right() -> Html {
    icon_base("M8 3L4 7l4 4M4 7h16M16 21l4-4-4-4M20 17H4")
}
pub fn icon_file_text() -> Html {
    icon_base("M14 2H6a2 2 0 00-2 2v16a2 2 0 002 2h12a2 2 0 002-2V8zM14 2v6h6M16 13H8M16 17H8")
}
pub fn icon_user() -> Html {
    icon_base("M20 21v-2a4 4 0 00-4-4H8a4 4 0 00-4 4v2M12 7m-4 0a4 4 0 108 0 4 4 0 10-8 0")
}
pub fn icon_log_out() -> Html {
    icon_base("M9 21H5a2 2 0 01-2-2V5a2 2 0 012-2h4M16 17l5-5-5-5M21 12H9")
}
pub fn icon_plus() -> Html {
    icon_base("M12 5v14M5 12h14")
}
pub fn icon_arrow_left() -> Html {
    icon_base("M19 12H5M12 19l-7-7 7-7")
}
pub fn icon_save() -> Html {
    icon_base("M19 21H5a2 2 0 01-2-2V5a2 2 0 012-2h11l5 5v11a2 2 0 01-2 2zM17 21v-8H7v8M7 3v5h8")
}
pub fn icon_mic() -> Html {
    icon_base("M12 1a3 3 0 00-3 3v8a3 3 0 006 0V4a3 3 0 00-3-3zM19 10v2a7 7 0 01-14 0v-2M12 19v4M8 23h8")
}
pub fn icon_pencil() -> Html {
    icon_base("M17 3a2.8 2.8 0 014 4L7.5 20.5 2 22l1.5-5.5z")
}
pub fn icon_trash() -> Html {
    icon_base("M3 6h18M19 6l-1 14a2 2 0 01-2 2H8a2 2 0 01-2-2L5 6M10 11v6M14 11v6M9 6V4h6v2")
}
pub fn icon_calendar() -> Html {
    icon_base("M3 4h18v18H3zM16 2v4M8 2v4M3 10h18")
}
pub fn icon_sparkles() -> Html {
    icon_base("M12 3l1.9 5.8L20 10l-6.1 1.2L12 17l-1.9-5.8L4 10l6.1-1.2z")
}
pub fn icon_download() -> Html {
    icon_base("M21 15v4a2 2 0 01-2 2H5a2 2 0 01-2-2v-4M7 10l5 5 5-5M12 15V3")
}
pub fn icon_check() -> Html {
    icon_base("M20 6L9 17l-5-5")
}

pub fn menu_icon(icon: MenuIcon) -> Html {
    match icon {
        MenuIcon::Dashboard => icon_layout_grid(),
        MenuIcon::Target => icon_target(),
        MenuIcon::HandCoins => icon_hand_coins(),
        MenuIcon::BanknoteDown => icon_banknote_down(),
        MenuIcon::CreditCard => icon_credit_card(),
        MenuIcon::ArrowLeftRight => icon_arrow_left_right(),
        MenuIcon::FileText => icon_file_text(),
        MenuIcon::User => icon_user(),
    }
}
