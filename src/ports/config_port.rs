//! Configuration access port trait.

pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    fn get_int(&self, section: &str, key: &str, default: i64) -> i64;
    fn get_double(&self, section: &str, key: &str, default: f64) -> f64;

    /// Window lengths and counts. Negative values read as 0 so validation
    /// can reject them as non-positive.
    fn get_usize(&self, section: &str, key: &str, default: usize) -> usize {
        let value = self.get_int(section, key, default as i64);
        usize::try_from(value).unwrap_or(0)
    }

    /// Point values. Negative values read as 0.
    fn get_points(&self, section: &str, key: &str, default: u32) -> u32 {
        let value = self.get_int(section, key, i64::from(default));
        u32::try_from(value).unwrap_or(0)
    }
}
