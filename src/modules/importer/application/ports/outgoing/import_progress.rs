/// Progress indicator advanced once per imported row.
pub trait ImportProgress: Send {
    fn advance(&mut self);

    fn finish(&mut self);
}
