fn main() {
    // ESP-IDF builds need the sysenv exported by embuild; host builds
    // (tests, simulator) have nothing to generate.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
