pub mod export;
pub mod generate;
pub mod history;
pub mod settings;
pub mod status;

/// Everything served under `/api`.
pub fn routes() -> Vec<rocket::Route> {
    routes![
        generate::generate,
        generate::generate_all,
        generate::shapes,
        history::list,
        history::show,
        history::clear,
        history::stats,
        export::export_many,
        export::export_one,
        settings::show,
        settings::save,
        status::status,
    ]
}
