fn main() {
    // Emit ESP-IDF cfg flags and link args for device builds only; host
    // builds (tests) run with the `espidf` feature disabled.
    if std::env::var_os("CARGO_FEATURE_ESPIDF").is_some() {
        embuild::espidf::sysenv::output();
    }
}
