use component_macros::Injectable;
use di_abstractions::{Dependency, Injectable};
use std::sync::Arc;

struct Database;

#[derive(Injectable)]
#[component(name = "Home")]
struct HomeController {
    #[inject("IDatabase")]
    database: Arc<Database>,
    hits: u64,
}

fn main() {
    assert_eq!(HomeController::component_name(), "Home");
    assert_eq!(
        HomeController::dependencies(),
        vec![Dependency::named("IDatabase"), Dependency::gap()]
    );
}
