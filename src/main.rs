fn main() -> anyhow::Result<()> {
    chapter_quiz_lib::run()
}
