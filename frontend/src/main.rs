use finance_analyzer_frontend::App;

fn main() {
    finance_analyzer_frontend::logging::init();
    yew::Renderer::<App>::new().render();
}
