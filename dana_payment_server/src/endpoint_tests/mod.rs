mod end_to_end;
mod merchant;
mod orders;
