fn main() {
    // Re-exports the ESP-IDF build environment for espidf builds;
    // a no-op on plain host builds.
    embuild::espidf::sysenv::output();
}
