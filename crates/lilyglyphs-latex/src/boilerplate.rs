//! Fixed text blocks of the generated stash document.

/// Placeholder replaced by the generating script's name in [`START_BANNER`].
pub const SCRIPT_NAME_MARKER: &str = "SCRIPT_NAME";

/// Copyright and GPL notice opening every generated document.
pub const LICENSE_BANNER: &str = r"%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%
%                                                                        %
%      This file is part of the 'lilyglyphs' LaTeX package.              %
%                                ==========                              %
%                                                                        %
%              https://github.com/uliska/lilyglyphs                      %
%                                                                        %
%  Copyright 2012 by Urs Liska, git@ursliska.de                          %
%                                                                        %
%  'lilyglyphs' is free software: you can redistribute it and/or modify  %
%  it under the terms of the GNU General Public License as published by  %
%  the Free Software Foundation, either version 3 of the License, or     %
%  (at your option) any later version.                                   %
%                                                                        %
%  This program is distributed in the hope that it will be useful,       %
%  but WITHOUT ANY WARRANTY; without even the implied warranty of        %
%  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the          %
%  GNU General Public License for more details.                          %
%                                                                        %
%  You should have received a copy of the GNU General Public License     %
%  along with this program.  If not, see <http://www.gnu.org/licenses/>. %
%                                                                        %
%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%
";

pub const TITLE_LINE: &str = "% New Image Glyphs for the lilyglyphs package\n";

pub const START_BANNER: &str = r"
% This file contains definitions for the new commands
% along with test code for them.
% Test the commands in the context of continuous text
% and adjust their design time options here.
% Afterwards move the commands to the appropriate .inp files
% manually: this file is overwritten by the next run of SCRIPT_NAME!
% Save it under a new name if you want to keep it for reference.
%
% The reference table below is meant for the lilyglyphs manual.
% Copy the whole table to lilyglyphs.tex or pick single rows.

\documentclass{scrartcl}
\usepackage{lilyglyphsStyle}

%%%%%%%%%%%%%%%%%%%%%%%%%
% new command definitions

";

pub const BEGIN_DOCUMENT: &str = r"

\begin{document}

%%%%%%%%%%%%%
% Text output

\section*{New \lilyglyphs{} commands}
";

pub const REFTABLE_BANNER: &str = r"
%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%
% Reference table to be used in the manual
% (use complete or single lines)

\begin{reftable}{New commands}{newcommands}
";

pub const TESTCODE_BANNER: &str = r"\end{reftable}

%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%%
% Test code for fine-tuning the new commands
";

pub const END_DOCUMENT: &str = "\\end{document}\n";
