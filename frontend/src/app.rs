use gloo_timers::callback::Timeout;
use yew::prelude::*;

use crate::components::{Banner, Layout, Notice, Notifier, Page};
use crate::config::{load_settings, Settings, BANNER_TIMEOUT_MS};
use crate::pages::{AnalyticsPage, DashboardPage, DemoPage, SettingsPage};

#[function_component(App)]
pub fn app() -> Html {
    let active_page = use_state(|| Page::Dashboard);
    let settings = use_state(load_settings);
    let notice = use_state(|| None::<Notice>);

    let on_select = {
        let active_page = active_page.clone();
        Callback::from(move |page: Page| active_page.set(page))
    };

    let notifier = {
        let notice = notice.clone();
        (*use_memo(
            move |_| {
                Notifier::new(Callback::from(move |next: Notice| {
                    notice.set(Some(next));
                }))
            },
            (),
        ))
        .clone()
    };

    {
        let current = (*notice).clone();
        let notice = notice.clone();
        use_effect_with_deps(
            move |current: &Option<Notice>| {
                let timeout = current
                    .as_ref()
                    .map(|_| Timeout::new(BANNER_TIMEOUT_MS, move || notice.set(None)));
                move || drop(timeout)
            },
            current,
        );
    }

    let on_dismiss = {
        let notice = notice.clone();
        Callback::from(move |_: ()| notice.set(None))
    };

    let content = match *active_page {
        Page::Dashboard => html! { <DashboardPage /> },
        Page::Analytics => html! { <AnalyticsPage /> },
        Page::Demo => html! { <DemoPage /> },
        Page::Settings => html! { <SettingsPage /> },
    };

    html! {
        <ContextProvider<UseStateHandle<Settings>> context={settings}>
            <ContextProvider<Notifier> context={notifier}>
                <Layout active_page={*active_page} on_select={on_select}>
                    { content }
                </Layout>
                <Banner notice={(*notice).clone()} on_dismiss={on_dismiss} />
            </ContextProvider<Notifier>>
        </ContextProvider<UseStateHandle<Settings>>>
    }
}
