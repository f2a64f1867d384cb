use yew::prelude::*;

use crate::config::Settings;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Page {
    Dashboard,
    Analytics,
    Demo,
    Settings,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum NoticeKind {
    Success,
    Error,
    Info,
}

#[derive(Clone, PartialEq, Debug)]
pub struct Notice {
    pub message: String,
    pub kind: NoticeKind,
}

/// Shows a transient banner. Provided through context by the app root.
#[derive(Clone, PartialEq)]
pub struct Notifier(Callback<Notice>);

impl Notifier {
    pub fn new(callback: Callback<Notice>) -> Self {
        Self(callback)
    }

    fn emit(&self, kind: NoticeKind, message: impl Into<String>) {
        self.0.emit(Notice {
            message: message.into(),
            kind,
        });
    }

    pub fn success(&self, message: impl Into<String>) {
        self.emit(NoticeKind::Success, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.emit(NoticeKind::Error, message);
    }

    pub fn info(&self, message: impl Into<String>) {
        self.emit(NoticeKind::Info, message);
    }
}

#[derive(Properties, PartialEq)]
pub struct LayoutProps {
    pub children: Children,
    pub active_page: Page,
    pub on_select: Callback<Page>,
}

#[function_component(Layout)]
pub fn layout(props: &LayoutProps) -> Html {
    html! {
        <div class="flex h-screen bg-background">
            <div class="hidden md:flex">
                <Sidebar active_page={props.active_page} on_select={props.on_select.clone()} />
            </div>

            <div class="flex-1 flex flex-col overflow-hidden">
                <Header />
                <main class="flex-1 overflow-y-auto">
                    { for props.children.iter() }
                </main>
            </div>
        </div>
    }
}

#[function_component(Header)]
fn header() -> Html {
    let settings = use_context::<UseStateHandle<Settings>>();
    let endpoint = settings
        .as_ref()
        .map(|s| s.api_endpoint.clone())
        .unwrap_or_default();

    html! {
        <header class="bg-[#D8E1E8] border-b border-border h-16 flex items-center justify-between px-6">
            <span class="font-bold text-[#173E63]">{"AI Finance Analyzer"}</span>
            <span class="text-xs text-slate-500 truncate max-w-xs" title="API endpoint">{ endpoint }</span>
        </header>
    }
}

struct NavItem {
    label: &'static str,
    page: Page,
    icon: fn() -> Html,
}

#[derive(Properties, PartialEq)]
struct SidebarProps {
    active_page: Page,
    on_select: Callback<Page>,
}

#[function_component(Sidebar)]
fn sidebar(props: &SidebarProps) -> Html {
    let nav_items = [
        NavItem {
            label: "Dashboard",
            page: Page::Dashboard,
            icon: icon_layout_grid,
        },
        NavItem {
            label: "Analytics",
            page: Page::Analytics,
            icon: icon_bar_chart,
        },
        NavItem {
            label: "Try the Demo",
            page: Page::Demo,
            icon: icon_sparkles,
        },
        NavItem {
            label: "Settings",
            page: Page::Settings,
            icon: icon_settings,
        },
    ];

    html! {
        <aside class="w-64 bg-[#173E63] text-white flex flex-col">
            <div class="h-16 flex items-center px-6 font-black tracking-tight">{"Finance Analyzer"}</div>
            <nav class="flex-1 px-3 space-y-1">
                { for nav_items.iter().map(|item| {
                    let page = item.page;
                    let onclick = {
                        let on_select = props.on_select.clone();
                        Callback::from(move |_| on_select.emit(page))
                    };
                    let class = if props.active_page == page {
                        "w-full flex items-center gap-3 px-4 py-2 rounded-lg bg-white/15 font-bold"
                    } else {
                        "w-full flex items-center gap-3 px-4 py-2 rounded-lg hover:bg-white/10"
                    };
                    html! {
                        <button class={class} onclick={onclick}>
                            { (item.icon)() }
                            <span class="text-sm">{ item.label }</span>
                        </button>
                    }
                }) }
            </nav>
        </aside>
    }
}

pub fn page_shell(title: &'static str, actions: Html, children: Html) -> Html {
    html! {
        <div class="p-6 max-w-7xl mx-auto">
            <div class="flex items-center justify-between pb-4 border-b border-border">
                <h1 class="text-2xl font-bold text-foreground">{ title }</h1>
                <div class="flex gap-2">{ actions }</div>
            </div>
            <div class="pt-5 space-y-6">
                { children }
            </div>
        </div>
    }
}

pub fn card(title: &'static str, children: Html) -> Html {
    html! {
        <div class="bg-card rounded-[10px] p-6 border border-border">
            <h3 class="font-bold text-foreground text-lg mb-3">{ title }</h3>
            { children }
        </div>
    }
}

pub fn empty_state(message: impl Into<String>) -> Html {
    html! {
        <div class="text-center text-muted-foreground py-4">
            <p class="text-sm">{ message.into() }</p>
        </div>
    }
}

#[derive(Clone, Copy, PartialEq)]
pub enum StatIcon {
    Wallet,
    CreditCard,
    Heart,
    Alert,
    TrendingUp,
    Calendar,
}

#[derive(Properties, PartialEq)]
pub struct StatCardProps {
    pub title: &'static str,
    pub value: String,
    pub icon: StatIcon,
    #[prop_or("text-[#1D617A]")]
    pub value_class: &'static str,
}

#[function_component(StatCard)]
pub fn stat_card(props: &StatCardProps) -> Html {
    html! {
        <div class="bg-card p-6 rounded-[10px] shadow-sm border border-border flex justify-between items-start">
            <div>
                <p class="text-muted-foreground text-[10px] font-bold mb-1 tracking-widest uppercase">{ props.title }</p>
                <h3 class={classes!("text-2xl", "font-bold", "tracking-tight", props.value_class)}>{ props.value.clone() }</h3>
            </div>
            <div class="p-3 bg-[#eef4f9] rounded-[10px]">
                {
                    match props.icon {
                        StatIcon::Wallet => icon_wallet(),
                        StatIcon::CreditCard => icon_credit_card(),
                        StatIcon::Heart => icon_heart(),
                        StatIcon::Alert => icon_alert(),
                        StatIcon::TrendingUp => icon_trending_up(),
                        StatIcon::Calendar => icon_calendar(),
                    }
                }
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct BannerProps {
    pub notice: Option<Notice>,
    pub on_dismiss: Callback<()>,
}

#[function_component(Banner)]
pub fn banner(props: &BannerProps) -> Html {
    let Some(notice) = &props.notice else {
        return html! {};
    };
    let class = match notice.kind {
        NoticeKind::Success => "bg-green-50 border-green-200 text-green-700",
        NoticeKind::Error => "bg-red-50 border-red-200 text-red-700",
        NoticeKind::Info => "bg-blue-50 border-blue-200 text-blue-700",
    };
    let on_dismiss = props.on_dismiss.reform(|_: MouseEvent| ());

    html! {
        <div class={classes!("fixed", "top-5", "right-5", "z-50", "min-w-[300px]", "max-w-md", "p-4", "rounded-lg", "border", "shadow-lg", "flex", "items-start", "gap-3", class)} role="alert">
            <p class="flex-1 text-sm font-medium">{ notice.message.clone() }</p>
            <button class="text-lg leading-none opacity-60 hover:opacity-100" aria-label="Dismiss" onclick={on_dismiss}>{"×"}</button>
        </div>
    }
}

fn icon_base(path: &'static str) -> Html {
    html! {
        <svg width="20" height="20" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round">
            <path d={path}></path>
        </svg>
    }
}

fn icon_layout_grid() -> Html {
    icon_base("M3 3h8v8H3zM13 3h8v8h-8zM3 13h8v8H3zM13 13h8v8h-8z")
}
fn icon_bar_chart() -> Html {
    icon_base("M4 20V10M10 20V4M16 20v-6M22 20H2")
}
fn icon_sparkles() -> Html {
    icon_base("M12 3l1.9 5.1L19 10l-5.1 1.9L12 17l-1.9-5.1L5 10l5.1-1.9z")
}
fn icon_settings() -> Html {
    icon_base("M12 1v3M12 20v3M4.2 4.2l2.1 2.1M17.7 17.7l2.1 2.1M1 12h3M20 12h3M4.2 19.8l2.1-2.1M17.7 6.3l2.1-2.1")
}
fn icon_wallet() -> Html {
    icon_base("M3 7h18v10H3zM16 7V5H5v2")
}
fn icon_credit_card() -> Html {
    icon_base("M3 7h18v10H3zM3 11h18")
}
fn icon_heart() -> Html {
    icon_base("M20.8 4.6a5.5 5.5 0 00-7.8 0L12 5.7l-1-1.1a5.5 5.5 0 00-7.8 7.8L12 21.2l8.8-8.8a5.5 5.5 0 000-7.8z")
}
fn icon_alert() -> Html {
    icon_base("M12 9v4M12 17h.01M10.3 3.9L1.8 18a2 2 0 001.7 3h17a2 2 0 001.7-3L13.7 3.9a2 2 0 00-3.4 0z")
}
fn icon_trending_up() -> Html {
    icon_base("M3 17l6-6 4 4 7-7")
}
fn icon_calendar() -> Html {
    icon_base("M3 5h18v16H3zM16 3v4M8 3v4M3 11h18")
}
pub fn icon_plus() -> Html {
    icon_base("M12 5v14M5 12h14")
}
pub fn icon_refresh() -> Html {
    icon_base("M23 4v6h-6M1 20v-6h6M3.5 9a9 9 0 0114.8-3.4L23 10M1 14l4.7 4.4A9 9 0 0020.5 15")
}
pub fn icon_download() -> Html {
    icon_base("M21 15v4a2 2 0 01-2 2H5a2 2 0 01-2-2v-4M7 10l5 5 5-5M12 15V3")
}
