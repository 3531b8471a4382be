pub type CmdResult<T> = idrewrite::Result<(T, i32)>;

pub mod rewrite;
