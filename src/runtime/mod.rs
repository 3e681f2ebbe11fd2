pub mod lifetime {
    pub mod shutdown;
    pub mod startup;
}
