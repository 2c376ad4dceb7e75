/// User-facing notification seam for rejected or destructive drops
pub trait Notifier {
    /// Blocking message
    fn alert(&mut self, message: &str);

    /// Yes/no question
    fn confirm(&mut self, message: &str) -> bool;
}
